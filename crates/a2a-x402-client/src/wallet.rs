//! Signer registry and payment creation.
//!
//! Maps CAIP-2 networks to scheme clients, built once from
//! `(network, private key)` pairs. EVM keys produce an EIP-3009 signer,
//! Solana keys an SPL transfer signer; anything else fails construction.

use std::collections::HashMap;
use std::str::FromStr;

use a2a_core::Message;
use a2a_x402::chain::ChainId;
use a2a_x402::config::NetworkKeyPair;
use a2a_x402::networks::normalize_network;
use a2a_x402::proto::{PaymentRequired, PaymentRequirements};
use a2a_x402::scheme::{ResourceInfo, SchemeClient};
use a2a_x402::state::encode::encode_payment_submission;
use a2a_x402_evm::ExactEvmClient;
use a2a_x402_svm::ExactSvmClient;

use crate::error::ClientError;

/// Holds one scheme client per configured network. Immutable after
/// construction; private keys never leave the signers.
pub struct X402Wallet {
    signers: HashMap<String, Box<dyn SchemeClient>>,
}

impl std::fmt::Debug for X402Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X402Wallet")
            .field("networks", &self.signers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl X402Wallet {
    /// Builds a wallet from network/private-key pairs.
    ///
    /// Network names may be aliases (`"base-sepolia"`) or CAIP-2
    /// identifiers. Construction fails on an empty list, an unknown
    /// chain family, or an unparseable key.
    pub fn new(key_pairs: &[NetworkKeyPair]) -> Result<Self, ClientError> {
        if key_pairs.is_empty() {
            return Err(ClientError::NoKeyPairs);
        }

        let mut signers: HashMap<String, Box<dyn SchemeClient>> = HashMap::new();
        for pair in key_pairs {
            let network = normalize_network(&pair.network_name);
            let chain_id = ChainId::from_str(&network)
                .map_err(|_| ClientError::UnsupportedNetwork(pair.network_name.clone()))?;

            let signer: Box<dyn SchemeClient> = match chain_id.namespace() {
                "eip155" => Box::new(ExactEvmClient::from_private_key(&pair.private_key).map_err(
                    |source| ClientError::Signer {
                        network: network.clone(),
                        source,
                    },
                )?),
                "solana" => Box::new(
                    ExactSvmClient::from_private_key(&pair.private_key, chain_id.reference())
                        .map_err(|source| ClientError::Signer {
                            network: network.clone(),
                            source,
                        })?,
                ),
                _ => return Err(ClientError::UnsupportedNetwork(pair.network_name.clone())),
            };
            signers.insert(network, signer);
        }

        Ok(Self { signers })
    }

    /// Selects the first requirement whose network has a registered
    /// signer supporting its scheme.
    pub fn select_requirement<'a>(
        &self,
        accepts: &'a [PaymentRequirements],
    ) -> Result<&'a PaymentRequirements, ClientError> {
        accepts
            .iter()
            .find(|req| {
                self.signers
                    .get(&req.network.to_string())
                    .is_some_and(|signer| signer.supports(req))
            })
            .ok_or_else(|| {
                ClientError::NoAcceptableRequirement(
                    "no payment requirement matches a registered signer".to_owned(),
                )
            })
    }

    /// Signs a payment for the chosen requirement.
    pub async fn sign_payment(
        &self,
        requirements: &PaymentRequirements,
        resource: Option<&ResourceInfo>,
    ) -> Result<a2a_x402::proto::PaymentPayload, ClientError> {
        let signer = self
            .signers
            .get(&requirements.network.to_string())
            .ok_or_else(|| {
                ClientError::NoAcceptableRequirement(format!(
                    "no signer for network {}",
                    requirements.network
                ))
            })?;
        signer
            .sign_payment(requirements, resource)
            .await
            .map_err(ClientError::Signing)
    }

    /// Reacts to a `payment-required` quote: selects a requirement,
    /// signs it, and encodes the submission message for the task.
    pub async fn process_payment_required(
        &self,
        task_id: &str,
        required: &PaymentRequired,
    ) -> Result<Message, ClientError> {
        if required.accepts.is_empty() {
            return Err(ClientError::NoAcceptableRequirement(
                "no payment options available".to_owned(),
            ));
        }

        let requirements = self.select_requirement(&required.accepts)?;
        let resource = ResourceInfo::from_requirements(requirements);
        let payload = self.sign_payment(requirements, resource.as_ref()).await?;

        encode_payment_submission(task_id, &payload).map_err(ClientError::State)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVM_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn pair(network: &str, key: &str) -> NetworkKeyPair {
        NetworkKeyPair {
            network_name: network.to_owned(),
            private_key: key.to_owned(),
        }
    }

    fn requirement(network: ChainId) -> PaymentRequirements {
        PaymentRequirements {
            scheme: "exact".to_owned(),
            network,
            amount: "1000000".to_owned(),
            pay_to: "0x036CbD53842c5426634e7929541eC2318f3dCF7e".to_owned(),
            max_timeout_seconds: 600,
            asset: "0x036CbD53842c5426634e7929541eC2318f3dCF7e".to_owned(),
            extra: Some(serde_json::json!({"name": "USDC", "version": "2"})),
        }
    }

    #[test]
    fn empty_key_pair_list_fails_construction() {
        assert!(matches!(
            X402Wallet::new(&[]),
            Err(ClientError::NoKeyPairs)
        ));
    }

    #[test]
    fn unknown_network_fails_construction() {
        let err = X402Wallet::new(&[pair("cosmos:cosmoshub-4", "key")]).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedNetwork(_)));

        let err = X402Wallet::new(&[pair("not-a-network", "key")]).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedNetwork(_)));
    }

    #[test]
    fn bad_private_key_fails_construction() {
        let err = X402Wallet::new(&[pair("base-sepolia", "garbage")]).unwrap_err();
        assert!(matches!(err, ClientError::Signer { .. }));
    }

    #[test]
    fn aliases_normalize_during_construction() {
        let wallet = X402Wallet::new(&[pair("base-sepolia", EVM_KEY)]).unwrap();
        let req = requirement(ChainId::new("eip155", "84532"));
        assert!(wallet.select_requirement(std::slice::from_ref(&req)).is_ok());
    }

    #[test]
    fn select_requirement_skips_unsupported_networks() {
        let wallet = X402Wallet::new(&[pair("base-sepolia", EVM_KEY)]).unwrap();

        let unsupported = requirement(ChainId::new("eip155", "8453"));
        let supported = requirement(ChainId::new("eip155", "84532"));
        let candidates = [unsupported, supported.clone()];
        let selected = wallet.select_requirement(&candidates).unwrap();
        assert_eq!(*selected, supported);
    }

    #[test]
    fn select_requirement_fails_when_nothing_matches() {
        let wallet = X402Wallet::new(&[pair("base-sepolia", EVM_KEY)]).unwrap();
        let err = wallet
            .select_requirement(&[requirement(ChainId::new("eip155", "8453"))])
            .unwrap_err();
        assert!(matches!(err, ClientError::NoAcceptableRequirement(_)));
    }

    #[tokio::test]
    async fn process_payment_required_produces_a_submission() {
        let wallet = X402Wallet::new(&[pair("base-sepolia", EVM_KEY)]).unwrap();
        let required =
            PaymentRequired::new(vec![requirement(ChainId::new("eip155", "84532"))]);

        let message = wallet
            .process_payment_required("task-1", &required)
            .await
            .unwrap();

        assert_eq!(message.task_id.as_deref(), Some("task-1"));
        let metadata = message.metadata.as_ref().unwrap();
        assert_eq!(metadata["x402.payment.status"], "payment-submitted");
        // The submitted payload echoes the chosen requirement.
        assert_eq!(
            metadata["x402.payment.payload"]["accepted"]["network"],
            "eip155:84532"
        );
    }

    #[tokio::test]
    async fn empty_accepts_is_rejected() {
        let wallet = X402Wallet::new(&[pair("base-sepolia", EVM_KEY)]).unwrap();
        let err = wallet
            .process_payment_required("task-1", &PaymentRequired::new(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NoAcceptableRequirement(_)));
    }
}
