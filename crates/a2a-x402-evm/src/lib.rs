//! EIP-155 "exact" payment scheme.
//!
//! Implements both halves of the exact-amount scheme on EVM chains using
//! ERC-3009 `transferWithAuthorization`:
//!
//! - [`exact::ExactEvmClient`] — signs EIP-712 transfer authorizations
//! - [`exact::ExactEvmServer`] — resolves money prices into atomic USDC
//!   amounts and EIP-712 domain parameters
//! - [`networks`] — known USDC deployments per chain

pub mod exact;
pub mod networks;

pub use exact::{ExactEvmClient, ExactEvmServer};
