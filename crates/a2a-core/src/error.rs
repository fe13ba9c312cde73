//! Error types for the A2A transport layer.

/// Errors produced by the A2A transport layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum A2aError {
    /// The requested task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// A JSON-RPC request used an unknown method.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Request or response parameters failed to (de)serialize.
    #[error("invalid params: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// The remote peer returned a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Human-readable message from the peer.
        message: String,
    },

    /// The `message/send` result was neither a task nor a message.
    #[error("unexpected message/send result shape")]
    UnexpectedResult,

    /// HTTP transport failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The agent card could not be used (missing fields, no extensions).
    #[error("agent card rejected: {0}")]
    AgentCard(String),

    /// The agent executor failed before enqueueing a failure event.
    #[error("executor error: {0}")]
    Executor(String),
}

/// JSON-RPC error code for a method that is not supported.
pub const RPC_METHOD_NOT_FOUND: i64 = -32601;

/// JSON-RPC error code for malformed parameters.
pub const RPC_INVALID_PARAMS: i64 = -32602;

/// JSON-RPC error code for internal server failures.
pub const RPC_INTERNAL_ERROR: i64 = -32603;

/// A2A-specific JSON-RPC error code for an unknown task id.
pub const RPC_TASK_NOT_FOUND: i64 = -32001;
