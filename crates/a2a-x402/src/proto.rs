//! x402 wire format types.
//!
//! These are the JSON shapes that travel inside A2A message metadata and
//! in facilitator request/response bodies. Field names follow the x402 V2
//! camelCase convention.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chain::ChainId;

/// Version marker that serializes as the integer `2` and rejects any
/// other value on deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct X402Version2;

impl Serialize for X402Version2 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(crate::X402_VERSION)
    }
}

impl<'de> Deserialize<'de> for X402Version2 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let version = u32::deserialize(deserializer)?;
        if version == crate::X402_VERSION {
            Ok(Self)
        } else {
            Err(serde::de::Error::custom(format!(
                "unsupported x402 version {version}, expected {}",
                crate::X402_VERSION
            )))
        }
    }
}

/// One acceptable way to pay: scheme × network × asset × amount × payee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    /// The payment scheme (e.g. `"exact"`).
    pub scheme: String,

    /// CAIP-2 network identifier.
    pub network: ChainId,

    /// Amount in the asset's smallest unit, as a decimal string.
    pub amount: String,

    /// The recipient address.
    pub pay_to: String,

    /// Maximum time in seconds the authorization stays valid.
    pub max_timeout_seconds: u64,

    /// The asset (token contract / mint) address.
    pub asset: String,

    /// Scheme-specific and A2A extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl PaymentRequirements {
    /// Compares the five protocol-critical fields: scheme, network,
    /// amount, asset, and payee. `maxTimeoutSeconds` and `extra` are
    /// deliberately ignored so server-side enrichment cannot cause
    /// false-negative rejections of an otherwise matching payload.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.scheme == other.scheme
            && self.network == other.network
            && self.amount == other.amount
            && self.asset == other.asset
            && self.pay_to == other.pay_to
    }

    /// Reads a string value from `extra`, if present.
    #[must_use]
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.as_ref()?.get(key)?.as_str()
    }

    /// Writes a value into `extra`, creating the map when absent.
    pub fn set_extra(&mut self, key: &str, value: Value) {
        match self.extra.as_mut().and_then(Value::as_object_mut) {
            Some(map) => {
                map.insert(key.to_owned(), value);
            }
            None => {
                let mut map = Map::new();
                map.insert(key.to_owned(), value);
                self.extra = Some(Value::Object(map));
            }
        }
    }
}

/// The quote a merchant hands back: every acceptable way to pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    /// Protocol version, always 2.
    pub x402_version: X402Version2,

    /// Acceptable payment requirements, at least one entry.
    pub accepts: Vec<PaymentRequirements>,
}

impl PaymentRequired {
    /// Wraps requirements into the versioned envelope.
    #[must_use]
    pub fn new(accepts: Vec<PaymentRequirements>) -> Self {
        Self {
            x402_version: X402Version2,
            accepts,
        }
    }
}

/// A signed payment authorization produced by the client.
///
/// `accepted` echoes exactly one element of the quote the client chose;
/// `payload` is the scheme-specific signed object and is opaque to this
/// protocol layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Protocol version, always 2.
    pub x402_version: X402Version2,

    /// The requirement this payload satisfies.
    pub accepted: PaymentRequirements,

    /// Scheme-specific signed payload.
    pub payload: Value,
}

impl PaymentPayload {
    /// Builds a payload for a chosen requirement.
    #[must_use]
    pub fn new(accepted: PaymentRequirements, payload: Value) -> Self {
        Self {
            x402_version: X402Version2,
            accepted,
            payload,
        }
    }
}

/// Facilitator response to a verify request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Whether the payment authorization is valid.
    pub is_valid: bool,

    /// Machine-readable reason when invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,

    /// Human-readable message when invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_message: Option<String>,

    /// The payer's address, when recovered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

impl VerifyResponse {
    /// Creates a valid verification response.
    #[must_use]
    pub fn valid(payer: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            invalid_reason: None,
            invalid_message: None,
            payer: Some(payer.into()),
        }
    }

    /// Creates an invalid verification response.
    #[must_use]
    pub fn invalid(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            invalid_reason: Some(reason.into()),
            invalid_message: Some(message.into()),
            payer: None,
        }
    }
}

/// Facilitator response to a settle request; doubles as the settlement
/// receipt recorded on the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    /// Whether settlement succeeded on-chain.
    pub success: bool,

    /// Machine-readable reason when settlement failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,

    /// The payer's address, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,

    /// Transaction hash or signature.
    #[serde(default)]
    pub transaction: String,

    /// CAIP-2 network where settlement occurred.
    pub network: String,
}

impl SettleResponse {
    /// Creates a successful settlement receipt.
    #[must_use]
    pub fn success(
        transaction: impl Into<String>,
        network: impl Into<String>,
        payer: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            error_reason: None,
            payer: Some(payer.into()),
            transaction: transaction.into(),
            network: network.into(),
        }
    }

    /// Creates a failed settlement receipt.
    #[must_use]
    pub fn failure(reason: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            success: false,
            error_reason: Some(reason.into()),
            payer: None,
            transaction: String::new(),
            network: network.into(),
        }
    }
}
