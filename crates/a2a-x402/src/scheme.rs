//! Client- and server-side scheme traits.
//!
//! A *scheme* is a payment construction (e.g. `"exact"`) bound to a chain
//! family. Scheme clients turn a chosen requirement into a signed
//! payload; scheme servers turn a human-readable price into protocol
//! requirements. Both sides are dyn-compatible so registries can hold
//! heterogeneous implementations.

use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chain::ChainId;
use crate::config::{DEFAULT_MAX_TIMEOUT_SECONDS, ResourceConfig};
use crate::proto::{PaymentPayload, PaymentRequirements};

/// Boxed error type shared by scheme implementations.
pub type SchemeError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future used by dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The canonical exact-amount scheme name.
pub const SCHEME_EXACT: &str = "exact";

/// Metadata about the resource a payment is for, handed to signers as
/// context. Assembled from the requirement's A2A extra fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    /// Resource identifier or URL.
    #[serde(default)]
    pub url: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// MIME type of the resource content.
    #[serde(default)]
    pub mime_type: String,
}

impl ResourceInfo {
    /// Builds resource info from a requirement's extra fields.
    ///
    /// Returns `None` when no A2A field is present.
    #[must_use]
    pub fn from_requirements(requirements: &PaymentRequirements) -> Option<Self> {
        let url = requirements.extra_str(crate::EXTRA_KEY_RESOURCE).unwrap_or_default();
        let description = requirements
            .extra_str(crate::EXTRA_KEY_DESCRIPTION)
            .unwrap_or_default();
        let mime_type = requirements
            .extra_str(crate::EXTRA_KEY_MIME_TYPE)
            .unwrap_or_default();
        if url.is_empty() && description.is_empty() && mime_type.is_empty() {
            return None;
        }
        Some(Self {
            url: url.to_owned(),
            description: description.to_owned(),
            mime_type: mime_type.to_owned(),
        })
    }
}

/// Client-side scheme: signs payment authorizations.
///
/// Deterministic inputs bind deterministically, but every signature uses
/// a fresh nonce; repeated calls never produce replayable payloads.
pub trait SchemeClient: Send + Sync {
    /// The scheme name this client implements.
    fn scheme(&self) -> &str;

    /// Returns `true` when this client can sign the given requirement.
    fn supports(&self, requirements: &PaymentRequirements) -> bool {
        requirements.scheme == self.scheme()
    }

    /// Signs a payment authorization for the chosen requirement.
    fn sign_payment<'a>(
        &'a self,
        requirements: &'a PaymentRequirements,
        resource: Option<&'a ResourceInfo>,
    ) -> BoxFuture<'a, Result<PaymentPayload, SchemeError>>;
}

/// A resolved token amount ready for use in payment requirements.
#[derive(Debug, Clone)]
pub struct AssetAmount {
    /// The token contract / mint address.
    pub asset: String,

    /// The amount in the token's smallest unit.
    pub amount: String,

    /// Scheme-specific extra data (e.g. EIP-712 domain parameters).
    pub extra: Option<Value>,
}

/// Server-side scheme: prices into protocol requirements.
pub trait SchemeServer: Send + Sync {
    /// The scheme name this server implements.
    fn scheme(&self) -> &str;

    /// Converts a human-readable price (e.g. `"1.50"`) into a token
    /// amount for the given network.
    fn parse_price(&self, price: &str, network: &ChainId) -> Result<AssetAmount, SchemeError>;

    /// Adds scheme-specific data after the base requirement is built.
    ///
    /// The default implementation returns the requirement unchanged.
    fn enhance_requirements(&self, requirements: PaymentRequirements) -> PaymentRequirements {
        requirements
    }

    /// Builds a complete requirement from a resource configuration.
    ///
    /// Built requirements always carry a non-empty scheme, network, and
    /// payee.
    fn build_requirements(
        &self,
        config: &ResourceConfig,
    ) -> Result<PaymentRequirements, SchemeError> {
        if config.pay_to.is_empty() {
            return Err("payTo address must not be empty".into());
        }
        let network = ChainId::from_str(&config.network)
            .map_err(|e| -> SchemeError { e.to_string().into() })?;
        let asset_amount = self.parse_price(&config.price, &network)?;
        let base = PaymentRequirements {
            scheme: self.scheme().to_owned(),
            network,
            amount: asset_amount.amount,
            pay_to: config.pay_to.clone(),
            max_timeout_seconds: config
                .max_timeout_seconds
                .unwrap_or(DEFAULT_MAX_TIMEOUT_SECONDS),
            asset: asset_amount.asset,
            extra: asset_amount.extra,
        };
        Ok(self.enhance_requirements(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_info_reads_a2a_extra_fields() {
        let mut requirements = PaymentRequirements {
            scheme: SCHEME_EXACT.to_owned(),
            network: ChainId::new("eip155", "84532"),
            amount: "1000000".to_owned(),
            pay_to: "0xMerchant".to_owned(),
            max_timeout_seconds: 600,
            asset: "0xUSDC".to_owned(),
            extra: None,
        };
        assert!(ResourceInfo::from_requirements(&requirements).is_none());

        requirements.set_extra(crate::EXTRA_KEY_RESOURCE, serde_json::json!("/generate-image"));
        requirements.set_extra(crate::EXTRA_KEY_MIME_TYPE, serde_json::json!("application/json"));

        let info = ResourceInfo::from_requirements(&requirements).unwrap();
        assert_eq!(info.url, "/generate-image");
        assert_eq!(info.mime_type, "application/json");
        assert!(info.description.is_empty());
    }
}
