//! Client configuration.
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "networkKeyPairs": [
//!     {"networkName": "base-sepolia", "privateKey": "0x..."}
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use a2a_x402::config::NetworkKeyPair;

use crate::error::ClientError;

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Networks the client can sign payments on.
    pub network_key_pairs: Vec<NetworkKeyPair>,
}

impl ClientConfig {
    /// Loads configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse {}: {e}", path.display())))
    }
}
