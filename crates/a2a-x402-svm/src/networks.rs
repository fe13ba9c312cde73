//! Known Solana networks, USDC mints, and default RPC endpoints.

use solana_pubkey::Pubkey;

/// Genesis-hash reference for Solana mainnet.
pub const SOLANA_MAINNET_REFERENCE: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";

/// Genesis-hash reference for Solana devnet.
pub const SOLANA_DEVNET_REFERENCE: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1";

/// Genesis-hash reference for Solana testnet.
pub const SOLANA_TESTNET_REFERENCE: &str = "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z";

/// A USDC mint deployment on one Solana network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintDeployment {
    /// CAIP-2 chain reference the mint lives on.
    pub chain_reference: &'static str,

    /// Base58 mint address.
    pub mint: &'static str,

    /// Number of decimal places.
    pub decimals: u8,
}

/// USDC mints on the networks this extension recognizes.
///
/// Testnet has no Circle deployment and is absent; pricing on it fails.
pub static USDC_MINTS: &[MintDeployment] = &[
    // Solana mainnet — native Circle USDC
    MintDeployment {
        chain_reference: SOLANA_MAINNET_REFERENCE,
        mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        decimals: 6,
    },
    // Solana devnet — native Circle USDC testnet
    MintDeployment {
        chain_reference: SOLANA_DEVNET_REFERENCE,
        mint: "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU",
        decimals: 6,
    },
];

/// Returns the USDC deployment for a chain reference, if known.
#[must_use]
pub fn usdc_mint(chain_reference: &str) -> Option<&'static MintDeployment> {
    USDC_MINTS
        .iter()
        .find(|d| d.chain_reference == chain_reference)
}

/// Returns the deployment for a given mint address, if known.
#[must_use]
pub fn deployment_by_mint(mint: &Pubkey) -> Option<&'static MintDeployment> {
    let mint = mint.to_string();
    USDC_MINTS.iter().find(|d| d.mint == mint)
}

/// Returns the default public RPC endpoint for a chain reference.
#[must_use]
pub fn default_rpc_url(chain_reference: &str) -> Option<&'static str> {
    match chain_reference {
        SOLANA_MAINNET_REFERENCE => Some("https://api.mainnet-beta.solana.com"),
        SOLANA_DEVNET_REFERENCE => Some("https://api.devnet.solana.com"),
        SOLANA_TESTNET_REFERENCE => Some("https://api.testnet.solana.com"),
        _ => None,
    }
}
