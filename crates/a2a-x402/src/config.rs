//! Configuration types.

use serde::{Deserialize, Serialize};

/// Default authorization validity window when a service does not set one.
pub const DEFAULT_MAX_TIMEOUT_SECONDS: u64 = 300;

/// What a merchant charges for one protected resource on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfig {
    /// Payment scheme identifier (e.g. `"exact"`).
    pub scheme: String,

    /// Recipient address.
    pub pay_to: String,

    /// Human-readable price (e.g. `"1.0"`).
    pub price: String,

    /// CAIP-2 network identifier.
    pub network: String,

    /// Maximum time in seconds for payment validity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_timeout_seconds: Option<u64>,
}

/// One network a merchant accepts payments on, from the server config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Network alias or CAIP-2 identifier.
    pub network_name: String,

    /// Address payments are sent to on this network.
    pub pay_to_address: String,
}

/// One network a client can sign payments on, from the client config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkKeyPair {
    /// Network alias or CAIP-2 identifier.
    pub network_name: String,

    /// Private key for this network's chain family.
    pub private_key: String,
}
