//! Readers: typed payment values out of task and message metadata.
//!
//! Precedence: when both the live message and the task's status message
//! carry a key, the live message wins (it is newer information from the
//! current request). Receipts are read from the task only; a client can
//! never smuggle receipts in through an inbound message.

use a2a_core::{Message, Task};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StateError;
use crate::proto::{PaymentPayload, PaymentRequired, SettleResponse};
use crate::state::{PaymentState, PaymentStatus};

fn message_metadata(msg: Option<&Message>) -> Option<&Map<String, Value>> {
    msg?.metadata.as_ref()
}

fn task_metadata(task: &Task) -> Option<&Map<String, Value>> {
    task.status.message.as_ref()?.metadata.as_ref()
}

/// Looks up `key` in the live message first, then the task status message.
fn lookup<'a>(
    task: &'a Task,
    message: Option<&'a Message>,
    key: &str,
) -> Option<&'a Value> {
    message_metadata(message)
        .and_then(|m| m.get(key))
        .or_else(|| task_metadata(task).and_then(|m| m.get(key)))
}

fn decode<T: DeserializeOwned>(key: &'static str, value: &Value) -> Result<T, StateError> {
    if !value.is_object() {
        return Err(StateError::invalid(key, "expected a map"));
    }
    serde_json::from_value(value.clone()).map_err(|e| StateError::invalid(key, e.to_string()))
}

/// Extracts the payment status, preferring the live message.
///
/// Absent status is `Ok(None)`; a present but non-string or unknown
/// status value is an error.
pub fn extract_status(
    task: &Task,
    message: Option<&Message>,
) -> Result<Option<PaymentStatus>, StateError> {
    let Some(value) = lookup(task, message, crate::METADATA_KEY_STATUS) else {
        return Ok(None);
    };
    let s = value
        .as_str()
        .ok_or_else(|| StateError::invalid(crate::METADATA_KEY_STATUS, "expected a string"))?;
    s.parse::<PaymentStatus>()
        .map(Some)
        .map_err(|e| StateError::invalid(crate::METADATA_KEY_STATUS, e.to_string()))
}

/// Extracts the quote from the task's status message.
pub fn extract_requirements(task: &Task) -> Result<Option<PaymentRequired>, StateError> {
    match task_metadata(task).and_then(|m| m.get(crate::METADATA_KEY_REQUIRED)) {
        Some(value) => Ok(Some(decode(crate::METADATA_KEY_REQUIRED, value)?)),
        None => Ok(None),
    }
}

/// Extracts the signed payload, preferring the live message.
pub fn extract_payload(
    task: &Task,
    message: Option<&Message>,
) -> Result<Option<PaymentPayload>, StateError> {
    match lookup(task, message, crate::METADATA_KEY_PAYLOAD) {
        Some(value) => Ok(Some(decode(crate::METADATA_KEY_PAYLOAD, value)?)),
        None => Ok(None),
    }
}

/// Extracts the receipts list from the task only.
pub fn extract_receipts(task: &Task) -> Result<Vec<SettleResponse>, StateError> {
    let Some(value) = task_metadata(task).and_then(|m| m.get(crate::METADATA_KEY_RECEIPTS)) else {
        return Ok(Vec::new());
    };
    let array = value
        .as_array()
        .ok_or_else(|| StateError::invalid(crate::METADATA_KEY_RECEIPTS, "expected an array"))?;
    array
        .iter()
        .map(|entry| decode(crate::METADATA_KEY_RECEIPTS, entry))
        .collect()
}

/// Extracts the preserved original prompt, if any.
#[must_use]
pub fn extract_original_prompt(task: &Task) -> Option<String> {
    task_metadata(task)?
        .get(crate::METADATA_KEY_ORIGINAL_PROMPT)?
        .as_str()
        .map(str::to_owned)
}

/// Extracts the error-code string, if any.
#[must_use]
pub fn extract_error(task: &Task) -> Option<String> {
    task_metadata(task)?
        .get(crate::METADATA_KEY_ERROR)?
        .as_str()
        .map(str::to_owned)
}

/// Reconstructs the aggregate [`PaymentState`] from a task and an
/// optional live message.
pub fn extract_state(task: &Task, message: Option<&Message>) -> Result<PaymentState, StateError> {
    Ok(PaymentState {
        status: extract_status(task, message)?,
        message: None,
        requirements: extract_requirements(task)?,
        payload: extract_payload(task, message)?,
        receipts: extract_receipts(task)?,
    })
}
