//! Facilitator client trait.
//!
//! The facilitator is the external HTTP service that performs on-chain
//! verify and settle on behalf of the merchant. Both operations are
//! single blocking network calls; neither is retried here — retry policy
//! belongs to the caller, and the current merchant fails fast.

use crate::proto::{PaymentPayload, PaymentRequirements, SettleResponse, VerifyResponse};
use crate::scheme::{BoxFuture, SchemeError};

/// Verifies and settles payments against an x402 facilitator.
///
/// Dyn-compatible so resource servers can hold `Box<dyn FacilitatorClient>`.
pub trait FacilitatorClient: Send + Sync {
    /// Checks a payment authorization against its requirement.
    fn verify<'a>(
        &'a self,
        payload: &'a PaymentPayload,
        requirements: &'a PaymentRequirements,
    ) -> BoxFuture<'a, Result<VerifyResponse, SchemeError>>;

    /// Submits the payment on-chain.
    fn settle<'a>(
        &'a self,
        payload: &'a PaymentPayload,
        requirements: &'a PaymentRequirements,
    ) -> BoxFuture<'a, Result<SettleResponse, SchemeError>>;
}
