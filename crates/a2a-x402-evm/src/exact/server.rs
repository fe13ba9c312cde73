//! Server-side pricing for the EIP-155 exact scheme.

use a2a_x402::chain::ChainId;
use a2a_x402::scheme::{AssetAmount, SCHEME_EXACT, SchemeError, SchemeServer};

use crate::networks::{TokenDeployment, usdc_deployment};

/// Resolves money prices into atomic USDC amounts for EVM networks and
/// annotates requirements with the EIP-712 domain parameters clients
/// need for ERC-3009 signing.
#[derive(Debug, Default)]
pub struct ExactEvmServer;

impl ExactEvmServer {
    /// Creates a server scheme over the known USDC deployments.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn deployment(network: &ChainId) -> Result<&'static TokenDeployment, SchemeError> {
        if network.namespace() != "eip155" {
            return Err(format!("not an EVM network: {network}").into());
        }
        let reference: u64 = network
            .reference()
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid eip155 reference: {e}").into() })?;
        usdc_deployment(reference)
            .ok_or_else(|| -> SchemeError { format!("no known USDC deployment on {network}").into() })
    }
}

impl SchemeServer for ExactEvmServer {
    fn scheme(&self) -> &str {
        SCHEME_EXACT
    }

    fn parse_price(&self, price: &str, network: &ChainId) -> Result<AssetAmount, SchemeError> {
        let deployment = Self::deployment(network)?;
        let amount = parse_decimal_to_atomic(price, deployment.decimals)?;
        Ok(AssetAmount {
            asset: format!("{:#x}", deployment.address),
            amount,
            extra: Some(serde_json::json!({
                "name": deployment.eip712_name,
                "version": deployment.eip712_version,
            })),
        })
    }
}

/// Converts a money string (e.g. `"1.50"`, `"$0.01"`) into atomic units.
///
/// The conversion is exact: no float arithmetic, fractional digits beyond
/// the token's precision are rejected.
fn parse_decimal_to_atomic(price: &str, decimals: u8) -> Result<String, SchemeError> {
    let cleaned = price.trim().trim_start_matches('$').trim();
    if cleaned.is_empty() {
        return Err(format!("invalid money string '{price}'").into());
    }

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned, ""),
    };

    let whole_val: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid money string '{price}': {e}").into() })?
    };

    let places = u32::from(decimals);
    if frac.len() > places as usize {
        return Err(format!("'{price}' has more than {decimals} fractional digits").into());
    }

    let frac_val: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = places as usize);
        padded
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid money string '{price}': {e}").into() })?
    };

    let total = whole_val
        .checked_mul(10u128.pow(places))
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(|| -> SchemeError { format!("amount overflow for '{price}'").into() })?;
    Ok(total.to_string())
}
