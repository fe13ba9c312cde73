//! Minimal A2A (agent-to-agent) protocol layer.
//!
//! This crate carries the transport-level pieces that the x402 payment
//! extension builds on:
//!
//! - [`types`] — Wire format types (messages, tasks, agent cards, events,
//!   JSON-RPC envelope)
//! - [`executor`] — Server-side [`AgentExecutor`](executor::AgentExecutor)
//!   contract, per-request context, and the status event queue
//! - [`store`] — In-memory task store shared across requests
//! - [`server`] — Axum JSON-RPC handler that forwards inbound HTTP headers
//!   into the per-request call context
//! - [`client`] — Reqwest-based JSON-RPC client and agent-card fetch
//!
//! Payment semantics live entirely outside this crate; everything here is
//! generic over `message/send` + `tasks/get` request handling.

pub mod client;
pub mod error;
pub mod executor;
pub mod server;
pub mod store;
pub mod types;

pub use error::A2aError;
pub use types::{
    AgentCapabilities, AgentCard, AgentExtension, AgentSkill, Message, Part, Role, SendMessageResult,
    Task, TaskState, TaskStatus, TaskStatusUpdateEvent,
};

/// Well-known path where an agent publishes its card.
pub const AGENT_CARD_PATH: &str = "/.well-known/agent-card.json";

/// HTTP header a client uses to activate protocol extensions.
pub const EXTENSIONS_HEADER: &str = "X-A2A-Extensions";
