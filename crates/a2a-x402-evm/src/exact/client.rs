//! Client-side signing for the EIP-155 exact scheme.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, B256, U256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolStruct, eip712_domain};
use rand::Rng;

use a2a_x402::proto::{PaymentPayload, PaymentRequirements};
use a2a_x402::scheme::{BoxFuture, ResourceInfo, SCHEME_EXACT, SchemeClient, SchemeError};

use crate::exact::{Eip3009Authorization, ExactEvmPayload, RequirementsExtra, TransferWithAuthorization};

/// The authorization window starts this far in the past so a payment is
/// immediately valid despite clock skew between client and chain.
const VALID_AFTER_SKEW_SECS: u64 = 10 * 60;

/// Signs ERC-3009 `transferWithAuthorization` payments with an in-memory
/// private key. The key never leaves the signer.
#[derive(Debug)]
pub struct ExactEvmClient {
    signer: PrivateKeySigner,
}

impl ExactEvmClient {
    /// Creates a client from a hex-encoded private key, with or without
    /// a `0x` prefix.
    pub fn from_private_key(key: &str) -> Result<Self, SchemeError> {
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid EVM private key: {e}").into() })?;
        Ok(Self { signer })
    }

    /// Returns the signer's address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign(&self, requirements: &PaymentRequirements) -> Result<ExactEvmPayload, SchemeError> {
        if requirements.network.namespace() != "eip155" {
            return Err(format!(
                "EVM scheme cannot sign for network {}",
                requirements.network
            )
            .into());
        }
        let chain_id: u64 = requirements
            .network
            .reference()
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid eip155 reference: {e}").into() })?;
        let asset: Address = requirements
            .asset
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid asset address: {e}").into() })?;
        let pay_to: Address = requirements
            .pay_to
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid payTo address: {e}").into() })?;
        let value: U256 = requirements
            .amount
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid amount: {e}").into() })?;

        let extra: RequirementsExtra = requirements
            .extra
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        let domain = eip712_domain! {
            name: extra.name,
            version: extra.version,
            chain_id: chain_id,
            verifying_contract: asset,
        };

        let now = unix_now();
        let valid_after = now.saturating_sub(VALID_AFTER_SKEW_SECS);
        let valid_before = now + requirements.max_timeout_seconds;
        let nonce = B256::from(rand::rng().random::<[u8; 32]>());

        // The facilitator reconstructs this struct from the authorization
        // fields to check the signature; the two must match exactly.
        let transfer = TransferWithAuthorization {
            from: self.signer.address(),
            to: pay_to,
            value,
            validAfter: U256::from(valid_after),
            validBefore: U256::from(valid_before),
            nonce,
        };

        let hash = transfer.eip712_signing_hash(&domain);
        let signature = self
            .signer
            .sign_hash(&hash)
            .await
            .map_err(|e| -> SchemeError { format!("EIP-712 signing failed: {e}").into() })?;

        Ok(ExactEvmPayload {
            signature: signature.as_bytes().into(),
            authorization: Eip3009Authorization {
                from: self.signer.address(),
                to: pay_to,
                value: value.to_string(),
                valid_after: valid_after.to_string(),
                valid_before: valid_before.to_string(),
                nonce,
            },
        })
    }
}

impl SchemeClient for ExactEvmClient {
    fn scheme(&self) -> &str {
        SCHEME_EXACT
    }

    fn sign_payment<'a>(
        &'a self,
        requirements: &'a PaymentRequirements,
        _resource: Option<&'a ResourceInfo>,
    ) -> BoxFuture<'a, Result<PaymentPayload, SchemeError>> {
        Box::pin(async move {
            let payload = self.sign(requirements).await?;
            let value = serde_json::to_value(&payload)
                .map_err(|e| -> SchemeError { e.to_string().into() })?;
            Ok(PaymentPayload::new(requirements.clone(), value))
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
