//! Writers: typed payment values into message metadata.
//!
//! Encoding goes value → JSON tree → metadata map entry; no schema is
//! lost along the way. Writers are the only mutation path for payment
//! metadata: the merchant writes agent-role messages, the client writes
//! user-role messages.

use a2a_core::Message;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StateError;
use crate::proto::{PaymentPayload, PaymentRequired, SettleResponse};
use crate::state::PaymentStatus;

/// Serializes a value into a JSON object map.
fn to_map<T: Serialize>(value: &T) -> Result<Map<String, Value>, StateError> {
    match serde_json::to_value(value).map_err(StateError::Encode)? {
        Value::Object(map) => Ok(map),
        other => Err(StateError::Encode(serde::ser::Error::custom(format!(
            "expected object, got {other}"
        )))),
    }
}

/// Sets the payment status string.
pub fn set_status(msg: &mut Message, status: PaymentStatus) {
    msg.metadata_mut().insert(
        crate::METADATA_KEY_STATUS.to_owned(),
        Value::String(status.as_str().to_owned()),
    );
}

/// Sets the payment requirements envelope as a nested map.
pub fn set_requirements(
    msg: &mut Message,
    requirements: &PaymentRequired,
) -> Result<(), StateError> {
    let map = to_map(requirements)?;
    msg.metadata_mut()
        .insert(crate::METADATA_KEY_REQUIRED.to_owned(), Value::Object(map));
    Ok(())
}

/// Sets the signed payment payload as a nested map.
pub fn set_payload(msg: &mut Message, payload: &PaymentPayload) -> Result<(), StateError> {
    let map = to_map(payload)?;
    msg.metadata_mut()
        .insert(crate::METADATA_KEY_PAYLOAD.to_owned(), Value::Object(map));
    Ok(())
}

/// Appends receipts to the receipts array, preserving existing entries.
pub fn append_receipts(msg: &mut Message, receipts: &[SettleResponse]) -> Result<(), StateError> {
    if receipts.is_empty() {
        return Ok(());
    }

    let metadata = msg.metadata_mut();
    let mut array = match metadata.remove(crate::METADATA_KEY_RECEIPTS) {
        Some(Value::Array(existing)) => existing,
        _ => Vec::new(),
    };
    for receipt in receipts {
        array.push(Value::Object(to_map(receipt)?));
    }
    metadata.insert(crate::METADATA_KEY_RECEIPTS.to_owned(), Value::Array(array));
    Ok(())
}

/// Sets the short error-code string. Empty codes are ignored.
pub fn set_error(msg: &mut Message, code: &str) {
    if code.is_empty() {
        return;
    }
    msg.metadata_mut().insert(
        crate::METADATA_KEY_ERROR.to_owned(),
        Value::String(code.to_owned()),
    );
}

/// Preserves the user's original request text. Empty prompts are ignored.
pub fn set_original_prompt(msg: &mut Message, prompt: &str) {
    if prompt.is_empty() {
        return;
    }
    msg.metadata_mut().insert(
        crate::METADATA_KEY_ORIGINAL_PROMPT.to_owned(),
        Value::String(prompt.to_owned()),
    );
}

/// Removes the `payload` and `required` keys only.
///
/// Called on terminal completion so a re-read of the task cannot replay
/// the authorization. Receipts and status stay in place.
pub fn clear_payment_metadata(msg: &mut Message) {
    if let Some(metadata) = msg.metadata.as_mut() {
        metadata.remove(crate::METADATA_KEY_PAYLOAD);
        metadata.remove(crate::METADATA_KEY_REQUIRED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2a_core::{Part, Role};
    use crate::chain::ChainId;
    use crate::proto::PaymentRequirements;

    fn message() -> Message {
        Message::new(Role::Agent, Part::text("Payment required"))
    }

    fn requirement() -> PaymentRequirements {
        PaymentRequirements {
            scheme: "exact".to_owned(),
            network: ChainId::new("eip155", "84532"),
            amount: "1000000".to_owned(),
            pay_to: "0xMerchant".to_owned(),
            max_timeout_seconds: 600,
            asset: "0xUSDC".to_owned(),
            extra: None,
        }
    }

    #[test]
    fn set_status_writes_wire_string() {
        let mut msg = message();
        set_status(&mut msg, PaymentStatus::Required);
        let value = &msg.metadata.as_ref().unwrap()[crate::METADATA_KEY_STATUS];
        assert_eq!(value, "payment-required");
    }

    #[test]
    fn set_requirements_nests_a_map() {
        let mut msg = message();
        let required = PaymentRequired::new(vec![requirement()]);
        set_requirements(&mut msg, &required).unwrap();

        let value = &msg.metadata.as_ref().unwrap()[crate::METADATA_KEY_REQUIRED];
        assert!(value.is_object());
        assert_eq!(value["x402Version"], 2);
        assert_eq!(value["accepts"][0]["payTo"], "0xMerchant");
    }

    #[test]
    fn append_receipts_preserves_existing_entries() {
        let mut msg = message();
        let first = SettleResponse::success("0xaaa", "eip155:84532", "0xPayer");
        let second = SettleResponse::success("0xbbb", "eip155:84532", "0xPayer");

        append_receipts(&mut msg, &[first]).unwrap();
        append_receipts(&mut msg, &[second]).unwrap();

        let receipts = msg.metadata.as_ref().unwrap()[crate::METADATA_KEY_RECEIPTS]
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(receipts.len(), 2);
        assert_eq!(receipts[0]["transaction"], "0xaaa");
        assert_eq!(receipts[1]["transaction"], "0xbbb");
    }

    #[test]
    fn append_receipts_noop_on_empty_slice() {
        let mut msg = message();
        append_receipts(&mut msg, &[]).unwrap();
        assert!(msg.metadata.is_none());
    }

    #[test]
    fn clear_removes_only_payload_and_required() {
        let mut msg = message();
        set_status(&mut msg, PaymentStatus::Completed);
        set_requirements(&mut msg, &PaymentRequired::new(vec![requirement()])).unwrap();
        set_payload(
            &mut msg,
            &PaymentPayload::new(requirement(), serde_json::json!({"sig": "0x1"})),
        )
        .unwrap();
        append_receipts(
            &mut msg,
            &[SettleResponse::success("0xaaa", "eip155:84532", "0xPayer")],
        )
        .unwrap();

        clear_payment_metadata(&mut msg);

        let metadata = msg.metadata.as_ref().unwrap();
        assert!(!metadata.contains_key(crate::METADATA_KEY_PAYLOAD));
        assert!(!metadata.contains_key(crate::METADATA_KEY_REQUIRED));
        assert!(metadata.contains_key(crate::METADATA_KEY_STATUS));
        assert!(metadata.contains_key(crate::METADATA_KEY_RECEIPTS));
    }

    #[test]
    fn empty_error_and_prompt_are_ignored() {
        let mut msg = message();
        set_error(&mut msg, "");
        set_original_prompt(&mut msg, "");
        assert!(msg.metadata.is_none());

        set_error(&mut msg, "payment_verification_failed");
        set_original_prompt(&mut msg, "Generate an image of a sunset");
        let metadata = msg.metadata.as_ref().unwrap();
        assert_eq!(
            metadata[crate::METADATA_KEY_ERROR],
            "payment_verification_failed"
        );
        assert_eq!(
            metadata[crate::METADATA_KEY_ORIGINAL_PROMPT],
            "Generate an image of a sunset"
        );
    }
}
