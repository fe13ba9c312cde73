//! Recognized networks and name normalization.
//!
//! Network identifiers appear on the wire as CAIP-2 strings. Configuration
//! files may also use the short aliases `"base"` and `"base-sepolia"`,
//! which normalize to their CAIP-2 form.

use crate::chain::ChainId;

/// Base mainnet.
pub const NETWORK_BASE: &str = "eip155:8453";

/// Base Sepolia testnet.
pub const NETWORK_BASE_SEPOLIA: &str = "eip155:84532";

/// Solana mainnet (genesis-hash reference).
pub const NETWORK_SOLANA_MAINNET: &str = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";

/// Solana devnet.
pub const NETWORK_SOLANA_DEVNET: &str = "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1";

/// Solana testnet.
pub const NETWORK_SOLANA_TESTNET: &str = "solana:4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z";

/// A known network definition with its alias and CAIP-2 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Human-readable network alias (e.g. `"base-sepolia"`).
    pub name: &'static str,
    /// CAIP-2 namespace (e.g. `"eip155"`, `"solana"`).
    pub namespace: &'static str,
    /// Chain reference (e.g. `"84532"`).
    pub reference: &'static str,
}

impl NetworkInfo {
    /// Creates a [`ChainId`] from this network info.
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        ChainId::new(self.namespace, self.reference)
    }
}

/// All networks this extension recognizes.
pub static KNOWN_NETWORKS: &[NetworkInfo] = &[
    NetworkInfo {
        name: "base",
        namespace: "eip155",
        reference: "8453",
    },
    NetworkInfo {
        name: "base-sepolia",
        namespace: "eip155",
        reference: "84532",
    },
    NetworkInfo {
        name: "solana",
        namespace: "solana",
        reference: "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
    },
    NetworkInfo {
        name: "solana-devnet",
        namespace: "solana",
        reference: "EtWTRABZaYq6iMfeYKouRu166VU2xqa1",
    },
    NetworkInfo {
        name: "solana-testnet",
        namespace: "solana",
        reference: "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z",
    },
];

/// Converts a network alias to CAIP-2 form.
///
/// Strings already in CAIP-2 form (or unknown) are returned unchanged.
#[must_use]
pub fn normalize_network(network: &str) -> String {
    KNOWN_NETWORKS
        .iter()
        .find(|info| info.name == network)
        .map_or_else(|| network.to_owned(), |info| info.chain_id().to_string())
}

/// Looks up the chain ID for a known network alias.
#[must_use]
pub fn chain_id_by_name(name: &str) -> Option<ChainId> {
    KNOWN_NETWORKS
        .iter()
        .find(|info| info.name == name)
        .map(NetworkInfo::chain_id)
}
