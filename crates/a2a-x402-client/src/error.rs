//! Client error taxonomy.

use a2a_core::error::A2aError;
use a2a_x402::error::StateError;
use a2a_x402::scheme::SchemeError;

/// Errors surfaced by the client payment loop.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientError {
    /// No key pairs were supplied at construction.
    #[error("at least one network-key pair is required")]
    NoKeyPairs,

    /// A configured network has no supported chain family.
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    /// A signer could not be constructed for a configured network.
    #[error("failed to create signer for network {network}: {source}")]
    Signer {
        /// The offending network identifier.
        network: String,
        /// The underlying construction error.
        source: SchemeError,
    },

    /// None of the quoted requirements can be satisfied by a registered
    /// signer.
    #[error("no acceptable payment requirement: {0}")]
    NoAcceptableRequirement(String),

    /// Signing the chosen requirement failed.
    #[error("failed to create payment payload: {0}")]
    Signing(SchemeError),

    /// The task reached `payment-failed`; carries the merchant's detail
    /// text.
    #[error("payment failed: {0}")]
    PaymentFailed(String),

    /// Transport-level failure.
    #[error(transparent)]
    Transport(#[from] A2aError),

    /// Payment metadata on a polled task was malformed.
    #[error(transparent)]
    State(#[from] StateError),

    /// Configuration file problems.
    #[error("configuration error: {0}")]
    Config(String),
}
