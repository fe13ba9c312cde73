//! The business service contract.
//!
//! Merchants implement [`BusinessService`] for the actual paid work. The
//! orchestrator quotes via [`service_requirements`], and invokes
//! [`execute`] only after the payment authorization has been verified —
//! and always before settlement, so a failed settle never leaves the
//! client charged without a result.
//!
//! [`service_requirements`]: BusinessService::service_requirements
//! [`execute`]: BusinessService::execute

use a2a_x402::config::DEFAULT_MAX_TIMEOUT_SECONDS;
use a2a_x402::scheme::SCHEME_EXACT;

/// Boxed error type for business failures.
pub type BusinessError = Box<dyn std::error::Error + Send + Sync>;

/// What one service invocation costs and delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequirements {
    /// Payment amount as a money string (e.g. `"1.0"`).
    pub price: String,

    /// Resource identifier or URL for this service.
    pub resource: String,

    /// Human-readable description of the service.
    pub description: String,

    /// MIME type of the result.
    pub mime_type: String,

    /// Payment scheme (e.g. `"exact"`).
    pub scheme: String,

    /// Seconds before the payment authorization expires.
    pub max_timeout_seconds: u64,
}

impl Default for ServiceRequirements {
    fn default() -> Self {
        Self {
            price: "0".to_owned(),
            resource: String::new(),
            description: String::new(),
            mime_type: "application/json".to_owned(),
            scheme: SCHEME_EXACT.to_owned(),
            max_timeout_seconds: DEFAULT_MAX_TIMEOUT_SECONDS,
        }
    }
}

/// The paid work behind the payment handshake.
#[async_trait::async_trait]
pub trait BusinessService: Send + Sync {
    /// Runs the business logic for a verified, paid request and returns
    /// the result text attached to the completed task.
    async fn execute(&self, prompt: &str) -> Result<String, BusinessError>;

    /// Quotes the service for a prompt before any payment happens.
    fn service_requirements(&self, prompt: &str) -> ServiceRequirements;
}
