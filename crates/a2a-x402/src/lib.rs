//! x402 payment extension for A2A agents.
//!
//! This crate defines the protocol core shared by merchants and clients:
//!
//! - [`proto`] — x402 wire format types (`PaymentRequirements`,
//!   `PaymentRequired`, `PaymentPayload`, facilitator responses)
//! - [`chain`] — CAIP-2 chain identifiers
//! - [`networks`] — Recognized networks and alias normalization
//! - [`state`] — Payment status model and the metadata codec over A2A
//!   messages (the actual protocol surface)
//! - [`scheme`] — Client- and server-side scheme traits
//! - [`facilitator`] — Verify/settle client trait
//! - [`config`] — Resource and key-pair configuration types
//! - [`error`] — Error taxonomy and the stable error-code strings
//!
//! All payment data travels inside the `metadata` map of ordinary A2A
//! messages, under the `x402.payment.*` keys declared here.

pub mod chain;
pub mod config;
pub mod error;
pub mod facilitator;
pub mod networks;
pub mod proto;
pub mod scheme;
pub mod state;

pub use chain::ChainId;
pub use error::StateError;
pub use proto::{
    PaymentPayload, PaymentRequired, PaymentRequirements, SettleResponse, VerifyResponse,
};
pub use state::{PaymentState, PaymentStatus};

/// URI identifying the x402 payment extension.
///
/// Advertised in the merchant agent card and required in the client's
/// `X-A2A-Extensions` header, byte-for-byte.
pub const X402_EXTENSION_URI: &str =
    "https://github.com/google-agentic-commerce/a2a-x402/blob/main/spec/v0.2";

/// Current x402 protocol version.
pub const X402_VERSION: u32 = 2;

/// Metadata key carrying the [`PaymentStatus`] string.
pub const METADATA_KEY_STATUS: &str = "x402.payment.status";

/// Metadata key carrying the [`PaymentRequired`] envelope as a nested map.
pub const METADATA_KEY_REQUIRED: &str = "x402.payment.required";

/// Metadata key carrying the signed [`PaymentPayload`] as a nested map.
pub const METADATA_KEY_PAYLOAD: &str = "x402.payment.payload";

/// Metadata key carrying the ordered settlement receipt list.
pub const METADATA_KEY_RECEIPTS: &str = "x402.payment.receipts";

/// Metadata key carrying a short stable error-code string.
pub const METADATA_KEY_ERROR: &str = "x402.payment.error";

/// Metadata key preserving the user's original request text across turns.
pub const METADATA_KEY_ORIGINAL_PROMPT: &str = "x402.payment.original_prompt";

/// Requirement `extra` key for the resource identifier or URL.
pub const EXTRA_KEY_RESOURCE: &str = "resource";

/// Requirement `extra` key for the human-readable service description.
pub const EXTRA_KEY_DESCRIPTION: &str = "description";

/// Requirement `extra` key for the resource MIME type.
pub const EXTRA_KEY_MIME_TYPE: &str = "mimeType";

/// Requirement `extra` key for an optional output schema.
pub const EXTRA_KEY_OUTPUT_SCHEMA: &str = "outputSchema";
