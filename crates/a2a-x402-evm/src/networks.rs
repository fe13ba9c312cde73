//! Known USDC deployments on supported EVM chains.

use alloy_primitives::{Address, address};

/// A USDC deployment: contract address, precision, and the EIP-712
/// domain parameters clients need for ERC-3009 signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDeployment {
    /// Numeric EIP-155 chain reference.
    pub chain_reference: u64,

    /// Token contract address.
    pub address: Address,

    /// Number of decimal places.
    pub decimals: u8,

    /// Token name as used in the EIP-712 domain.
    pub eip712_name: &'static str,

    /// Token version as used in the EIP-712 domain.
    pub eip712_version: &'static str,
}

/// USDC deployments on the chains this extension recognizes.
///
/// Source: <https://developers.circle.com/stablecoins/usdc-contract-addresses>
pub static USDC_DEPLOYMENTS: &[TokenDeployment] = &[
    // Base mainnet — native Circle USDC
    TokenDeployment {
        chain_reference: 8453,
        address: address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
        decimals: 6,
        eip712_name: "USD Coin",
        eip712_version: "2",
    },
    // Base Sepolia — native Circle USDC testnet
    TokenDeployment {
        chain_reference: 84532,
        address: address!("0x036CbD53842c5426634e7929541eC2318f3dCF7e"),
        decimals: 6,
        eip712_name: "USDC",
        eip712_version: "2",
    },
];

/// Returns the USDC deployment for an EIP-155 chain reference, if known.
#[must_use]
pub fn usdc_deployment(chain_reference: u64) -> Option<&'static TokenDeployment> {
    USDC_DEPLOYMENTS
        .iter()
        .find(|d| d.chain_reference == chain_reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_sepolia_deployment_is_known() {
        let deployment = usdc_deployment(84532).unwrap();
        assert_eq!(deployment.decimals, 6);
        assert_eq!(deployment.eip712_name, "USDC");
        assert!(usdc_deployment(1).is_none());
    }
}
