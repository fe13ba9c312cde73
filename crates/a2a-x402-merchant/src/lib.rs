//! Merchant side of the a2a-x402 payment extension.
//!
//! The centerpiece is the [`orchestrator::PaymentOrchestrator`], an
//! [`AgentExecutor`](a2a_core::executor::AgentExecutor) that drives a
//! task through the payment handshake: quote, authorization,
//! verification, business execution, settlement, completion.
//!
//! - [`business`] — The trait merchants implement for the paid work
//! - [`resource_server`] — Build/match/verify/settle over scheme servers
//!   and a facilitator client
//! - [`facilitator`] — HTTP facilitator client
//! - [`server`] — Agent card and axum serving glue
//! - [`config`] — JSON server configuration
//! - [`demo`] — The image-generation demo service used by the binary

pub mod business;
pub mod config;
pub mod demo;
pub mod facilitator;
pub mod orchestrator;
pub mod resource_server;
pub mod server;

mod transitions;

pub use business::{BusinessError, BusinessService, ServiceRequirements};
pub use facilitator::{FacilitatorConfig, HttpFacilitatorClient};
pub use orchestrator::PaymentOrchestrator;
pub use resource_server::{ResourceServer, X402ResourceServer};
