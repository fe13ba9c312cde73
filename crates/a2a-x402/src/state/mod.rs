//! Payment state model and the metadata codec.
//!
//! The protocol surface of the extension: strongly-typed payment values
//! encoded into (and decoded out of) the generic metadata maps carried by
//! A2A messages.
//!
//! - [`set`] — Write typed values into a message's metadata
//! - [`extract`] — Reconstruct typed values from a task and a live message
//! - [`record`] — Write whole transitions onto a task's status message
//! - [`encode`] — Build the client's payment submission message
//!
//! Extraction tolerates absent metadata (empty values, not errors) but
//! rejects keys that are present with an unexpected shape.

pub mod encode;
pub mod extract;
pub mod record;
pub mod set;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::proto::{PaymentPayload, PaymentRequired, SettleResponse};

/// The payment handshake status, carried as a wire-stable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Merchant produced a quote; awaiting a signed payload.
    #[serde(rename = "payment-required")]
    Required,
    /// Client submitted a signed payload; verification pending.
    #[serde(rename = "payment-submitted")]
    Submitted,
    /// Facilitator confirmed the authorization; business may run.
    #[serde(rename = "payment-verified")]
    Verified,
    /// A policy check declined the payload before verification.
    ///
    /// Reserved: the current merchant algorithm never emits it.
    #[serde(rename = "payment-rejected")]
    Rejected,
    /// Settled with receipts attached. Terminal.
    #[serde(rename = "payment-completed")]
    Completed,
    /// Terminal failure.
    #[serde(rename = "payment-failed")]
    Failed,
}

impl PaymentStatus {
    /// Returns the wire string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "payment-required",
            Self::Submitted => "payment-submitted",
            Self::Verified => "payment-verified",
            Self::Rejected => "payment-rejected",
            Self::Completed => "payment-completed",
            Self::Failed => "payment-failed",
        }
    }

    /// Returns `true` when `s` is one of the six known wire strings.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment-required" => Ok(Self::Required),
            "payment-submitted" => Ok(Self::Submitted),
            "payment-verified" => Ok(Self::Verified),
            "payment-rejected" => Ok(Self::Rejected),
            "payment-completed" => Ok(Self::Completed),
            "payment-failed" => Ok(Self::Failed),
            other => Err(UnknownPaymentStatus(other.to_owned())),
        }
    }
}

/// Error for a status string outside the six known tokens.
#[derive(Debug, thiserror::Error)]
#[error("unknown payment status: {0}")]
pub struct UnknownPaymentStatus(String);

/// Aggregate payment state, reconstructed on demand from task and message
/// metadata. Never persisted as a whole; each field round-trips through
/// its own metadata key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentState {
    /// Current handshake status, when any payment metadata exists.
    pub status: Option<PaymentStatus>,

    /// Business result text carried into the terminal transition.
    pub message: Option<String>,

    /// The quote, when one has been produced.
    pub requirements: Option<PaymentRequired>,

    /// The signed payload, when the client has submitted one.
    pub payload: Option<PaymentPayload>,

    /// Settlement receipts, ordered and append-only.
    pub receipts: Vec<SettleResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_roundtrip() {
        for status in [
            PaymentStatus::Required,
            PaymentStatus::Submitted,
            PaymentStatus::Verified,
            PaymentStatus::Rejected,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
        ] {
            let parsed: PaymentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn is_valid_gates_unknown_strings() {
        assert!(PaymentStatus::is_valid("payment-required"));
        assert!(PaymentStatus::is_valid("payment-failed"));
        assert!(!PaymentStatus::is_valid("payment-pending"));
        assert!(!PaymentStatus::is_valid(""));
        assert!(!PaymentStatus::is_valid("PAYMENT-REQUIRED"));
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&PaymentStatus::Submitted).unwrap();
        assert_eq!(json, "\"payment-submitted\"");
    }
}
