//! Client side of the a2a-x402 payment extension.
//!
//! - [`wallet`] — Signer registry keyed by network; selects a
//!   requirement from a quote and produces the signed submission
//! - [`client`] — The payment loop: poll the task, react to payment
//!   metadata, resubmit
//! - [`transport`] — Agent-card discovery and extension header injection
//! - [`config`] — JSON client configuration
//! - [`error`] — Client error taxonomy

pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod wallet;

pub use client::X402Client;
pub use error::ClientError;
pub use wallet::X402Wallet;
