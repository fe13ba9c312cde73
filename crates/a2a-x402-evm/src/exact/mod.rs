//! Wire format types for the EIP-155 exact scheme.
//!
//! The payload pairs an EIP-712 signature with the structured ERC-3009
//! authorization it covers. The facilitator reconstructs the signed
//! struct from the authorization fields, so both must match exactly.

mod client;
mod server;

pub use client::ExactEvmClient;
pub use server::ExactEvmServer;

use alloy_primitives::{Address, B256, Bytes};
use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};

sol! {
    /// EIP-712 struct for ERC-3009 `transferWithAuthorization`.
    struct TransferWithAuthorization {
        address from;
        address to;
        uint256 value;
        uint256 validAfter;
        uint256 validBefore;
        bytes32 nonce;
    }
}

/// The structured authorization data that was signed.
///
/// `value`, `validAfter`, and `validBefore` travel as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip3009Authorization {
    /// The token owner authorizing the transfer.
    pub from: Address,

    /// The recipient address.
    pub to: Address,

    /// Transfer amount in the token's smallest unit.
    pub value: String,

    /// Unix timestamp before which the authorization is invalid.
    pub valid_after: String,

    /// Unix timestamp at which the authorization expires.
    pub valid_before: String,

    /// Unique 32-byte nonce preventing replay.
    pub nonce: B256,
}

/// EIP-3009 payment payload: signature plus the authorization it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactEvmPayload {
    /// The EIP-712 signature (65 bytes for an EOA).
    pub signature: Bytes,

    /// The authorization that was signed.
    pub authorization: Eip3009Authorization,
}

/// EIP-712 domain parameters carried in requirement `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsExtra {
    /// Token name for the EIP-712 domain.
    #[serde(default)]
    pub name: String,

    /// Token version for the EIP-712 domain.
    #[serde(default)]
    pub version: String,
}
