//! Solana "exact" payment scheme.
//!
//! Implements both halves of the exact-amount scheme on Solana using SPL
//! `transfer_checked`:
//!
//! - [`exact::ExactSvmClient`] — builds and partially signs the transfer
//!   transaction (the facilitator's fee payer co-signs at settlement)
//! - [`exact::ExactSvmServer`] — resolves money prices into atomic USDC
//!   amounts per network
//! - [`networks`] — known mints, decimals, and default RPC endpoints

pub mod exact;
pub mod networks;

pub use exact::{ExactSvmClient, ExactSvmServer};
