//! Client-side submission encoding.

use a2a_core::{Message, Part, Role};

use crate::error::StateError;
use crate::proto::PaymentPayload;
use crate::state::{PaymentStatus, set};

/// Builds the user-role message that submits a signed payment for a task.
///
/// The message carries status `payment-submitted` and the payload map in
/// its metadata, plus a fixed human-readable text part.
pub fn encode_payment_submission(
    task_id: &str,
    payload: &PaymentPayload,
) -> Result<Message, StateError> {
    let mut message = Message::for_task(
        Role::User,
        task_id,
        Part::text("Payment authorization provided"),
    );
    set::set_status(&mut message, PaymentStatus::Submitted);
    set::set_payload(&mut message, payload)?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainId;
    use crate::proto::PaymentRequirements;

    #[test]
    fn submission_message_shape() {
        let accepted = PaymentRequirements {
            scheme: "exact".to_owned(),
            network: ChainId::new("eip155", "84532"),
            amount: "1000000".to_owned(),
            pay_to: "0xMerchant".to_owned(),
            max_timeout_seconds: 600,
            asset: "0xUSDC".to_owned(),
            extra: None,
        };
        let payload = PaymentPayload::new(accepted, serde_json::json!({"sig": "0x1"}));

        let message = encode_payment_submission("task-42", &payload).unwrap();

        assert_eq!(message.role, Role::User);
        assert_eq!(message.task_id.as_deref(), Some("task-42"));
        assert_eq!(message.first_text(), Some("Payment authorization provided"));

        let metadata = message.metadata.as_ref().unwrap();
        assert_eq!(metadata[crate::METADATA_KEY_STATUS], "payment-submitted");
        assert_eq!(
            metadata[crate::METADATA_KEY_PAYLOAD]["accepted"]["payTo"],
            "0xMerchant"
        );
    }
}
