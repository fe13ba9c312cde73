//! Resource server adapter: build, match, verify, settle.
//!
//! Wraps scheme servers (one per configured network) and a facilitator
//! client behind the four operations the orchestrator needs. Matching
//! compares scheme, network, payee, asset, and amount; timeout and extra
//! are deliberately excluded.

use std::collections::HashMap;

use a2a_x402::config::ResourceConfig;
use a2a_x402::facilitator::FacilitatorClient;
use a2a_x402::proto::{PaymentPayload, PaymentRequirements, SettleResponse, VerifyResponse};
use a2a_x402::scheme::{SchemeError, SchemeServer};

/// The operations the orchestrator requires from the merchant's x402
/// stack. Abstracted as a trait so orchestration logic can be exercised
/// against mocks.
#[async_trait::async_trait]
pub trait ResourceServer: Send + Sync {
    /// Derives the on-the-wire requirements for one network from a
    /// price/scheme/payee tuple.
    fn build_requirements(
        &self,
        config: &ResourceConfig,
    ) -> Result<Vec<PaymentRequirements>, SchemeError>;

    /// Selects from `accepts` the single requirement the submitted
    /// payload claims to satisfy.
    fn find_matching<'a>(
        &self,
        accepts: &'a [PaymentRequirements],
        payload: &PaymentPayload,
    ) -> Option<&'a PaymentRequirements> {
        accepts.iter().find(|r| r.matches(&payload.accepted))
    }

    /// Consults the facilitator about the payload's validity.
    async fn verify(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, SchemeError>;

    /// Submits the payment on-chain via the facilitator.
    async fn settle(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResponse, SchemeError>;
}

/// Production resource server: scheme servers keyed by CAIP-2 network
/// plus a facilitator client. Immutable after construction and shared
/// across concurrent tasks.
pub struct X402ResourceServer {
    schemes: HashMap<String, Box<dyn SchemeServer>>,
    facilitator: Box<dyn FacilitatorClient>,
}

impl std::fmt::Debug for X402ResourceServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X402ResourceServer")
            .field("networks", &self.schemes.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl X402ResourceServer {
    /// Creates a resource server around a facilitator client.
    #[must_use]
    pub fn new(facilitator: Box<dyn FacilitatorClient>) -> Self {
        Self {
            schemes: HashMap::new(),
            facilitator,
        }
    }

    /// Registers a scheme server for a CAIP-2 network.
    #[must_use]
    pub fn with_scheme(mut self, network: impl Into<String>, scheme: Box<dyn SchemeServer>) -> Self {
        self.schemes.insert(network.into(), scheme);
        self
    }

    fn scheme_for(&self, network: &str) -> Result<&dyn SchemeServer, SchemeError> {
        self.schemes
            .get(network)
            .map(Box::as_ref)
            .ok_or_else(|| -> SchemeError {
                format!("no scheme server registered for network {network}").into()
            })
    }
}

#[async_trait::async_trait]
impl ResourceServer for X402ResourceServer {
    fn build_requirements(
        &self,
        config: &ResourceConfig,
    ) -> Result<Vec<PaymentRequirements>, SchemeError> {
        let scheme = self.scheme_for(&config.network)?;
        if scheme.scheme() != config.scheme {
            return Err(format!(
                "scheme '{}' not supported on network {} (have '{}')",
                config.scheme,
                config.network,
                scheme.scheme()
            )
            .into());
        }
        Ok(vec![scheme.build_requirements(config)?])
    }

    async fn verify(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, SchemeError> {
        self.facilitator.verify(payload, requirements).await
    }

    async fn settle(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResponse, SchemeError> {
        self.facilitator.settle(payload, requirements).await
    }
}
