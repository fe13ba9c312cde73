//! Client-side transaction building and signing for the Solana exact
//! scheme.
//!
//! The client builds an SPL `transfer_checked` into the payee's
//! associated token account, with the facilitator's fee payer as the
//! transaction payer, and signs only its own slot. The fee payer adds
//! its signature at settlement.

use base64::prelude::*;
use solana_keypair::Keypair;
use solana_message::v0::Message as MessageV0;
use solana_message::VersionedMessage;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;

use a2a_x402::proto::{PaymentPayload, PaymentRequirements};
use a2a_x402::scheme::{BoxFuture, ResourceInfo, SCHEME_EXACT, SchemeClient, SchemeError};

use crate::exact::{ATA_PROGRAM_PUBKEY, ExactSolanaPayload, RequirementsExtra};
use crate::networks::{default_rpc_url, deployment_by_mint};

/// Derives the associated token account for an owner and mint.
fn associated_token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (ata, _) = Pubkey::find_program_address(
        &[owner.as_ref(), spl_token::id().as_ref(), mint.as_ref()],
        &ATA_PROGRAM_PUBKEY,
    );
    ata
}

/// Signs exact-amount SPL token payments with an in-memory keypair.
pub struct ExactSvmClient {
    keypair: Keypair,
    rpc: solana_client::nonblocking::rpc_client::RpcClient,
}

impl std::fmt::Debug for ExactSvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExactSvmClient")
            .field("pubkey", &self.keypair.pubkey())
            .finish_non_exhaustive()
    }
}

impl ExactSvmClient {
    /// Creates a client from a base58-encoded keypair and an RPC URL.
    pub fn new(keypair: Keypair, rpc_url: impl Into<String>) -> Self {
        Self {
            keypair,
            rpc: solana_client::nonblocking::rpc_client::RpcClient::new(rpc_url.into()),
        }
    }

    /// Creates a client from a base58 private key, resolving the default
    /// public RPC endpoint for the given chain reference.
    pub fn from_private_key(key: &str, chain_reference: &str) -> Result<Self, SchemeError> {
        let bytes = bs58::decode(key.trim())
            .into_vec()
            .map_err(|e| -> SchemeError { format!("invalid base58 private key: {e}").into() })?;
        let keypair = Keypair::try_from(bytes.as_slice())
            .map_err(|e| -> SchemeError { format!("invalid Solana keypair: {e}").into() })?;
        let rpc_url = default_rpc_url(chain_reference).ok_or_else(|| -> SchemeError {
            format!("no default RPC endpoint for solana:{chain_reference}").into()
        })?;
        Ok(Self::new(keypair, rpc_url))
    }

    /// Returns the signer's public key.
    #[must_use]
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn build_signed_transfer(
        &self,
        requirements: &PaymentRequirements,
    ) -> Result<String, SchemeError> {
        let extra: RequirementsExtra = requirements
            .extra
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let fee_payer: Pubkey = extra
            .fee_payer
            .as_deref()
            .ok_or_else(|| -> SchemeError { "missing feePayer in requirement extra".into() })?
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid feePayer: {e}").into() })?;

        let mint: Pubkey = requirements
            .asset
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid asset mint: {e}").into() })?;
        let pay_to: Pubkey = requirements
            .pay_to
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid payTo address: {e}").into() })?;
        let amount: u64 = requirements
            .amount
            .parse()
            .map_err(|e| -> SchemeError { format!("invalid amount: {e}").into() })?;
        let decimals = deployment_by_mint(&mint)
            .ok_or_else(|| -> SchemeError { format!("unknown mint {mint}").into() })?
            .decimals;

        let owner = self.keypair.pubkey();
        let source = associated_token_account(&owner, &mint);
        let destination = associated_token_account(&pay_to, &mint);

        let transfer = spl_token::instruction::transfer_checked(
            &spl_token::id(),
            &source,
            &mint,
            &destination,
            &owner,
            &[],
            amount,
            decimals,
        )
        .map_err(|e| -> SchemeError { format!("transfer instruction: {e}").into() })?;

        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| -> SchemeError { format!("get_latest_blockhash: {e}").into() })?;

        let message = MessageV0::try_compile(&fee_payer, &[transfer], &[], blockhash)
            .map_err(|e| -> SchemeError { format!("message compile: {e}").into() })?;
        let message = VersionedMessage::V0(message);

        let signature = self
            .keypair
            .try_sign_message(&message.serialize())
            .map_err(|e| -> SchemeError { format!("signing failed: {e}").into() })?;

        let num_required = message.header().num_required_signatures as usize;
        let position = message.static_account_keys()[..num_required]
            .iter()
            .position(|k| *k == owner)
            .ok_or_else(|| -> SchemeError { "signer not among required signers".into() })?;

        let mut signatures = vec![Signature::default(); num_required];
        signatures[position] = signature;

        let transaction = VersionedTransaction {
            signatures,
            message,
        };
        let bytes = bincode::serialize(&transaction)
            .map_err(|e| -> SchemeError { format!("transaction serialize: {e}").into() })?;
        Ok(BASE64_STANDARD.encode(bytes))
    }
}

impl SchemeClient for ExactSvmClient {
    fn scheme(&self) -> &str {
        SCHEME_EXACT
    }

    fn sign_payment<'a>(
        &'a self,
        requirements: &'a PaymentRequirements,
        _resource: Option<&'a ResourceInfo>,
    ) -> BoxFuture<'a, Result<PaymentPayload, SchemeError>> {
        Box::pin(async move {
            if requirements.network.namespace() != "solana" {
                return Err(format!(
                    "Solana scheme cannot sign for network {}",
                    requirements.network
                )
                .into());
            }
            let transaction = self.build_signed_transfer(requirements).await?;
            let payload = serde_json::to_value(ExactSolanaPayload { transaction })
                .map_err(|e| -> SchemeError { e.to_string().into() })?;
            Ok(PaymentPayload::new(requirements.clone(), payload))
        })
    }
}
