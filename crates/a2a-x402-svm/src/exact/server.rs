//! Server-side pricing for the Solana exact scheme.

use a2a_x402::chain::ChainId;
use a2a_x402::proto::PaymentRequirements;
use a2a_x402::scheme::{AssetAmount, SCHEME_EXACT, SchemeError, SchemeServer};

use crate::networks::usdc_mint;

/// Resolves money prices into atomic USDC amounts for Solana networks.
///
/// When a fee payer is configured it is written into requirement `extra`
/// so clients can compile transactions against it.
#[derive(Debug, Default)]
pub struct ExactSvmServer {
    fee_payer: Option<String>,
}

impl ExactSvmServer {
    /// Creates a server scheme without a fee payer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a server scheme advertising the facilitator's fee payer.
    #[must_use]
    pub fn with_fee_payer(fee_payer: impl Into<String>) -> Self {
        Self {
            fee_payer: Some(fee_payer.into()),
        }
    }
}

impl SchemeServer for ExactSvmServer {
    fn scheme(&self) -> &str {
        SCHEME_EXACT
    }

    fn parse_price(&self, price: &str, network: &ChainId) -> Result<AssetAmount, SchemeError> {
        if network.namespace() != "solana" {
            return Err(format!("not a Solana network: {network}").into());
        }
        let deployment = usdc_mint(network.reference()).ok_or_else(|| -> SchemeError {
            format!("no known USDC mint on {network}").into()
        })?;
        let amount = parse_decimal_to_atomic(price, deployment.decimals)?;
        Ok(AssetAmount {
            asset: deployment.mint.to_owned(),
            amount,
            extra: None,
        })
    }

    fn enhance_requirements(&self, mut requirements: PaymentRequirements) -> PaymentRequirements {
        if let Some(fee_payer) = &self.fee_payer {
            requirements.set_extra("feePayer", serde_json::json!(fee_payer));
        }
        requirements
    }
}

/// Converts a money string into atomic units without float arithmetic.
fn parse_decimal_to_atomic(price: &str, decimals: u8) -> Result<String, SchemeError> {
    let cleaned = price.trim().trim_start_matches('$').trim();
    if cleaned.is_empty() {
        return Err(format!("invalid money string '{price}'").into());
    }

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned, ""),
    };

    let whole_val: u64 = if whole.is_empty() {
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

    let frac_val: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = places as usize);
        padded
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid money string '{price}': {e}").into() })?
    };

    let total = whole_val
        .checked_mul(10u64.pow(places))
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(|| -> SchemeError { format!("amount overflow for '{price}'").into() })?;
    Ok(total.to_string())
}
