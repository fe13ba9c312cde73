//! Wire format types for the Solana exact scheme.

mod client;
mod server;

pub use client::ExactSvmClient;
pub use server::ExactSvmServer;

use serde::{Deserialize, Serialize};
use solana_pubkey::{Pubkey, pubkey};

/// Associated Token Account program id.
pub const ATA_PROGRAM_PUBKEY: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Solana exact payment payload: one base64-encoded serialized
/// transaction, partially signed by the payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactSolanaPayload {
    /// Base64-encoded serialized Solana transaction.
    pub transaction: String,
}

/// Scheme-specific fields carried in requirement `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsExtra {
    /// The facilitator's fee payer address; it co-signs at settlement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<String>,
}
