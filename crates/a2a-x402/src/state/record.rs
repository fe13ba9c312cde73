//! Transition recorders: whole state transitions onto a task.
//!
//! Each recorder writes one transition's metadata onto the task's status
//! message, creating an agent-role status message with a default text
//! when none exists yet. Task state itself is set by the orchestrator.

use a2a_core::{Part, Task};

use crate::error::StateError;
use crate::proto::{PaymentRequired, SettleResponse};
use crate::state::{PaymentState, PaymentStatus, set};

/// Records a fresh quote: status `payment-required` plus the envelope.
pub fn record_payment_required(
    task: &mut Task,
    requirements: &PaymentRequired,
    default_text: &str,
) -> Result<(), StateError> {
    let msg = task.status_message_or(default_text);
    set::set_status(msg, PaymentStatus::Required);
    set::set_requirements(msg, requirements)
}

/// Records a verified payment, carrying payload and requirements forward
/// so a later pass can settle without the original request message.
pub fn record_payment_verified(
    task: &mut Task,
    state: &PaymentState,
    default_text: &str,
) -> Result<(), StateError> {
    let msg = task.status_message_or(default_text);
    set::set_status(msg, PaymentStatus::Verified);
    if let Some(payload) = &state.payload {
        set::set_payload(msg, payload)?;
    }
    if let Some(requirements) = &state.requirements {
        set::set_requirements(msg, requirements)?;
    }
    Ok(())
}

/// Records terminal completion: result text, receipts, and the replay
/// guard (clears `payload` and `required`).
pub fn record_payment_completed(
    task: &mut Task,
    receipts: &[SettleResponse],
    result_text: &str,
) -> Result<(), StateError> {
    let msg = task.status_message_or(result_text);
    if !result_text.is_empty() {
        msg.parts.retain(|part| !matches!(part, Part::Text { .. }));
        msg.parts.push(Part::text(result_text));
    }
    set::set_status(msg, PaymentStatus::Completed);
    set::append_receipts(msg, receipts)?;
    set::clear_payment_metadata(msg);
    Ok(())
}

/// Records terminal failure: status, error code, and detail text.
pub fn record_payment_failed(task: &mut Task, error_code: &str, detail: &str) {
    let msg = task.status_message_or(if detail.is_empty() {
        "Payment failed"
    } else {
        detail
    });
    msg.parts.retain(|part| !matches!(part, Part::Text { .. }));
    msg.parts.push(Part::text(detail));
    set::set_status(msg, PaymentStatus::Failed);
    set::set_error(msg, error_code);
}
