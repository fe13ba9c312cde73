//! HTTP client for a remote x402 facilitator.
//!
//! Speaks the facilitator wire protocol: `POST {url}/verify` and
//! `POST {url}/settle` with `{x402Version, paymentPayload,
//! paymentRequirements}` bodies. Single request per operation, no retry.

use std::time::Duration;

use serde::Serialize;

use a2a_x402::facilitator::FacilitatorClient;
use a2a_x402::proto::{PaymentPayload, PaymentRequirements, SettleResponse, VerifyResponse};
use a2a_x402::scheme::{BoxFuture, SchemeError};

/// Configuration for [`HttpFacilitatorClient`].
#[derive(Debug, Clone)]
pub struct FacilitatorConfig {
    /// Facilitator base URL, without trailing slash.
    pub url: String,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl FacilitatorConfig {
    /// Creates a config with the given facilitator URL and a 30 s timeout.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Request body for verify/settle calls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FacilitatorRequestBody<'a> {
    x402_version: u32,
    payment_payload: &'a PaymentPayload,
    payment_requirements: &'a PaymentRequirements,
}

/// Async HTTP facilitator client with a long-lived connection pool.
#[derive(Debug)]
pub struct HttpFacilitatorClient {
    url: String,
    client: reqwest::Client,
}

impl HttpFacilitatorClient {
    /// Creates a client from the given configuration.
    pub fn new(config: FacilitatorConfig) -> Result<Self, SchemeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| -> SchemeError { format!("failed to build HTTP client: {e}").into() })?;
        Ok(Self {
            url: config.url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// Returns the facilitator base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<T, SchemeError> {
        let body = FacilitatorRequestBody {
            x402_version: a2a_x402::X402_VERSION,
            payment_payload: payload,
            payment_requirements: requirements,
        };

        let response = self
            .client
            .post(format!("{}/{endpoint}", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| -> SchemeError {
                format!("facilitator {endpoint} request failed: {e}").into()
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("facilitator {endpoint} failed ({status}): {text}").into());
        }

        response.json::<T>().await.map_err(|e| -> SchemeError {
            format!("facilitator {endpoint} response parse error: {e}").into()
        })
    }
}

impl FacilitatorClient for HttpFacilitatorClient {
    fn verify<'a>(
        &'a self,
        payload: &'a PaymentPayload,
        requirements: &'a PaymentRequirements,
    ) -> BoxFuture<'a, Result<VerifyResponse, SchemeError>> {
        Box::pin(self.post::<VerifyResponse>("verify", payload, requirements))
    }

    fn settle<'a>(
        &'a self,
        payload: &'a PaymentPayload,
        requirements: &'a PaymentRequirements,
    ) -> BoxFuture<'a, Result<SettleResponse, SchemeError>> {
        Box::pin(self.post::<SettleResponse>("settle", payload, requirements))
    }
}
