//! Merchant server configuration.
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "networkConfigs": [
//!     {"networkName": "base-sepolia", "payToAddress": "0xYourAddress"}
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use a2a_x402::config::NetworkConfig;
use a2a_x402::networks::normalize_network;

/// Top-level merchant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Networks payments are accepted on.
    pub network_configs: Vec<NetworkConfig>,
}

impl ServerConfig {
    /// Loads and validates configuration from a JSON file.
    ///
    /// Network aliases are normalized to CAIP-2; an empty network list
    /// is an error.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;

        if config.network_configs.is_empty() {
            return Err("no network configurations provided".into());
        }
        for network in &mut config.network_configs {
            network.network_name = normalize_network(&network.network_name);
        }
        Ok(config)
    }
}
