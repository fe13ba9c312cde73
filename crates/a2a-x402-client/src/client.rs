//! The client payment loop.
//!
//! Polls the task at a fixed interval, reacts to payment metadata, and
//! resubmits. Strictly single-threaded per task; never issues
//! overlapping sends for the same task id. Bounded deadlines are the
//! caller's job (wrap [`X402Client::wait_for_completion`] in
//! `tokio::time::timeout`); dropping the future cancels the loop.

use std::time::Duration;

use a2a_core::client::A2aClient;
use a2a_core::error::A2aError;
use a2a_core::types::{Message, Part, Role, SendMessageResult, Task};

use a2a_x402::config::NetworkKeyPair;
use a2a_x402::state::{PaymentStatus, extract};

use crate::error::ClientError;
use crate::transport;
use crate::wallet::X402Wallet;

/// How often the loop polls the task.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// An x402-capable A2A client: a wallet plus a connected transport.
#[derive(Debug)]
pub struct X402Client {
    wallet: X402Wallet,
    a2a: A2aClient,
}

impl X402Client {
    /// Connects to a merchant and builds signers for the given key pairs.
    pub async fn connect(
        merchant_url: &str,
        key_pairs: &[NetworkKeyPair],
    ) -> Result<Self, ClientError> {
        let wallet = X402Wallet::new(key_pairs)?;
        let a2a = transport::connect(merchant_url).await?;
        Ok(Self { wallet, a2a })
    }

    /// Creates a client from pre-built parts.
    #[must_use]
    pub fn new(wallet: X402Wallet, a2a: A2aClient) -> Self {
        Self { wallet, a2a }
    }

    /// Starts a task with the given text and drives it to a terminal
    /// state, paying along the way.
    pub async fn wait_for_completion(&self, text: &str) -> Result<Task, ClientError> {
        let message = Message::new(Role::User, Part::text(text));
        let mut task = match self.a2a.send_message(&message).await? {
            SendMessageResult::Task(task) => task,
            SendMessageResult::Message(_) => {
                return Err(ClientError::Transport(A2aError::UnexpectedResult));
            }
        };

        loop {
            task = self.a2a.get_task(&task.id).await?;
            self.process_payment_state(&task).await?;

            if task.status.state.is_terminal() {
                return Ok(task);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Reacts to the payment state of a polled task.
    ///
    /// Idempotence note: seeing the same `payment-required` twice sends
    /// a fresh submission, which is harmless — nonces bind the signature
    /// and the merchant short-circuits terminal tasks.
    async fn process_payment_state(&self, task: &Task) -> Result<(), ClientError> {
        let state = extract::extract_state(task, None)?;

        match state.status {
            Some(PaymentStatus::Required) => {
                let required = state.requirements.as_ref().ok_or_else(|| {
                    ClientError::NoAcceptableRequirement("no payment options available".to_owned())
                })?;

                tracing::info!(task_id = %task.id, options = required.accepts.len(), "payment required");
                let submission = self
                    .wallet
                    .process_payment_required(&task.id, required)
                    .await?;
                self.a2a.send_message(&submission).await?;
                Ok(())
            }
            Some(PaymentStatus::Failed) => Err(ClientError::PaymentFailed(error_text(task))),
            _ => Ok(()),
        }
    }
}

/// Extracts the human-readable failure detail from a terminal task:
/// the first text part of the status message, falling back to the whole
/// message as JSON.
fn error_text(task: &Task) -> String {
    let Some(message) = task.status.message.as_ref() else {
        return "payment failed".to_owned();
    };
    if let Some(text) = message.first_text() {
        return text.to_owned();
    }
    serde_json::to_string(message).unwrap_or_else(|_| "payment failed".to_owned())
}
