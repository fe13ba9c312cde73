//! Server-side executor contract.
//!
//! A request handler builds a [`RequestContext`] for each inbound
//! `message/send`, hands it to the configured [`AgentExecutor`] together
//! with a [`CallContext`] (transport metadata) and an [`EventQueue`], and
//! persists the resulting task snapshot once the executor returns.

use std::sync::Mutex;

use http::HeaderMap;

use crate::error::A2aError;
use crate::types::{Message, Task, TaskStatusUpdateEvent};

/// Transport-level metadata for one inbound request.
///
/// The server middleware forwards every inbound HTTP header here so
/// executors can inspect negotiation headers such as
/// [`EXTENSIONS_HEADER`](crate::EXTENSIONS_HEADER).
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    headers: HeaderMap,
}

impl CallContext {
    /// Creates a call context carrying the given request headers.
    #[must_use]
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// Returns all values of a header, split on commas and trimmed.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Returns the extension URIs the client activated for this request.
    #[must_use]
    pub fn requested_extensions(&self) -> Vec<String> {
        self.header_values(crate::EXTENSIONS_HEADER)
    }

    /// Returns `true` when the client requested the given extension URI.
    #[must_use]
    pub fn extension_requested(&self, uri: &str) -> bool {
        self.requested_extensions().iter().any(|u| u == uri)
    }
}

/// Per-request execution context.
///
/// Owns the task snapshot for the duration of one executor pass; the
/// request handler persists `task` back into the store afterwards.
#[derive(Debug)]
pub struct RequestContext {
    /// The inbound message.
    pub message: Message,

    /// The stored task, when the message references an existing one.
    pub task: Option<Task>,

    /// Task id for this request (existing or freshly minted).
    pub task_id: String,

    /// Context id for this request.
    pub context_id: String,
}

impl RequestContext {
    /// Builds a context for an inbound message and an optional stored task.
    ///
    /// When neither the message nor a stored task provides ids, fresh
    /// UUIDs are minted.
    #[must_use]
    pub fn new(message: Message, stored_task: Option<Task>) -> Self {
        let task_id = stored_task
            .as_ref()
            .map(|t| t.id.clone())
            .or_else(|| message.task_id.clone())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let context_id = stored_task
            .as_ref()
            .map(|t| t.context_id.clone())
            .or_else(|| message.context_id.clone())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self {
            message,
            task: stored_task,
            task_id,
            context_id,
        }
    }
}

/// Ordered sink for task status update events.
///
/// Events are buffered in order; the request handler drains them after the
/// executor pass. A streaming transport could forward them instead without
/// changing executors.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Mutex<Vec<TaskStatusUpdateEvent>>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a status update event.
    pub fn write(&self, event: TaskStatusUpdateEvent) -> Result<(), A2aError> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| A2aError::Executor("event queue poisoned".to_owned()))?;
        events.push(event);
        Ok(())
    }

    /// Drains all buffered events in emission order.
    #[must_use]
    pub fn drain(&self) -> Vec<TaskStatusUpdateEvent> {
        self.events.lock().map_or_else(|_| Vec::new(), |mut e| e.drain(..).collect())
    }
}

/// An agent implementation driven by the request handler.
///
/// `execute` runs once per inbound `message/send`; it may be re-entered
/// for the same task across requests and must reconstruct its state from
/// the task it is handed.
#[async_trait::async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Drives the task forward for one request.
    async fn execute(
        &self,
        call: &CallContext,
        ctx: &mut RequestContext,
        queue: &EventQueue,
    ) -> Result<(), A2aError>;

    /// Cancels the task referenced by the request.
    async fn cancel(
        &self,
        call: &CallContext,
        ctx: &mut RequestContext,
        queue: &EventQueue,
    ) -> Result<(), A2aError>;
}
