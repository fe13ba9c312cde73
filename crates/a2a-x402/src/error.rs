//! Error types and the stable error-code strings.

/// Stable error codes written under
/// [`METADATA_KEY_ERROR`](crate::METADATA_KEY_ERROR) on failed tasks.
pub mod codes {
    /// The transport exposed no extension information at all.
    pub const EXTENSION_MISSING: &str = "extension_missing";

    /// The client did not request the x402 extension.
    pub const EXTENSION_NOT_REQUESTED: &str = "extension_not_requested";

    /// Inbound task or message metadata was malformed.
    pub const STATE_EXTRACTION_FAILED: &str = "state_extraction_failed";

    /// Quote generation failed (misconfigured networks, pricing error).
    pub const PAYMENT_REQUIREMENTS_CREATION_FAILED: &str = "payment_requirements_creation_failed";

    /// The facilitator reported the payload invalid or was unreachable.
    pub const PAYMENT_VERIFICATION_FAILED: &str = "payment_verification_failed";

    /// The business service errored, or settlement failed afterwards.
    ///
    /// Settlement failures share this code with business failures; the
    /// human-readable status text distinguishes the two.
    pub const BUSINESS_EXECUTION_FAILED: &str = "business_execution_failed";
}

/// Errors raised by the payment metadata codec.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// A metadata key is present but its value has the wrong shape.
    #[error("invalid metadata under '{key}': {reason}")]
    InvalidMetadata {
        /// The offending metadata key.
        key: &'static str,
        /// What was wrong with the value.
        reason: String,
    },

    /// A payment value could not be serialized into a metadata map.
    #[error("failed to encode payment metadata: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StateError {
    /// Builds an [`StateError::InvalidMetadata`] for a key.
    #[must_use]
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            key,
            reason: reason.into(),
        }
    }
}
