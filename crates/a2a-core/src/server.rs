//! Axum JSON-RPC server plumbing.
//!
//! Exposes the agent card at the well-known path and a JSON-RPC endpoint
//! handling `message/send` and `tasks/get`. Every inbound HTTP header is
//! forwarded into the executor's [`CallContext`] so extension negotiation
//! headers survive the transport boundary.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::error::{
    A2aError, RPC_INTERNAL_ERROR, RPC_INVALID_PARAMS, RPC_METHOD_NOT_FOUND, RPC_TASK_NOT_FOUND,
};
use crate::executor::{AgentExecutor, CallContext, EventQueue, RequestContext};
use crate::store::TaskStore;
use crate::types::{
    AgentCard, GetTaskParams, JsonRpcRequest, JsonRpcResponse, SendMessageParams, SendMessageResult,
};

/// Dispatches JSON-RPC requests to an [`AgentExecutor`].
pub struct RequestHandler {
    executor: Arc<dyn AgentExecutor>,
    store: TaskStore,
}

impl RequestHandler {
    /// Creates a handler around an executor with a fresh task store.
    #[must_use]
    pub fn new(executor: Arc<dyn AgentExecutor>) -> Self {
        Self {
            executor,
            store: TaskStore::new(),
        }
    }

    /// Returns the task store backing this handler.
    #[must_use]
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Handles one JSON-RPC request.
    pub async fn handle(&self, headers: HeaderMap, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        let result = match request.method.as_str() {
            "message/send" => self.on_send_message(headers, request.params).await,
            "tasks/get" => self.on_get_task(request.params).await,
            other => Err(A2aError::UnknownMethod(other.to_owned())),
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => {
                tracing::warn!(method = %request.method, error = %err, "rpc request failed");
                JsonRpcResponse::failure(id, rpc_code(&err), err.to_string())
            }
        }
    }

    async fn on_send_message(
        &self,
        headers: HeaderMap,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, A2aError> {
        let params: SendMessageParams =
            serde_json::from_value(params.unwrap_or(serde_json::Value::Null))?;

        let stored = match &params.message.task_id {
            Some(task_id) => self.store.get(task_id).await,
            None => None,
        };

        let call = CallContext::new(headers);
        let mut ctx = RequestContext::new(params.message, stored);
        let queue = EventQueue::new();

        let outcome = self.executor.execute(&call, &mut ctx, &queue).await;

        let events = queue.drain();
        tracing::debug!(task_id = %ctx.task_id, events = events.len(), "executor pass finished");

        // The executor owns the task snapshot; persist whatever it left
        // behind even when the pass itself errored, so terminal failure
        // states stay observable through tasks/get.
        if let Some(task) = ctx.task.clone() {
            self.store.upsert(task).await;
        }

        outcome?;
        let task = ctx.task.ok_or(A2aError::UnexpectedResult)?;
        Ok(serde_json::to_value(SendMessageResult::Task(task))?)
    }

    async fn on_get_task(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, A2aError> {
        let params: GetTaskParams =
            serde_json::from_value(params.unwrap_or(serde_json::Value::Null))?;
        let task = self
            .store
            .get(&params.id)
            .await
            .ok_or_else(|| A2aError::TaskNotFound(params.id.clone()))?;
        Ok(serde_json::to_value(task)?)
    }
}

const fn rpc_code(err: &A2aError) -> i64 {
    match err {
        A2aError::UnknownMethod(_) => RPC_METHOD_NOT_FOUND,
        A2aError::InvalidParams(_) => RPC_INVALID_PARAMS,
        A2aError::TaskNotFound(_) => RPC_TASK_NOT_FOUND,
        _ => RPC_INTERNAL_ERROR,
    }
}

#[derive(Clone)]
struct AppState {
    handler: Arc<RequestHandler>,
    card: Arc<AgentCard>,
}

/// Builds the agent's HTTP router: the agent card at
/// [`AGENT_CARD_PATH`](crate::AGENT_CARD_PATH) and JSON-RPC at `/rpc`.
pub fn router(card: AgentCard, handler: Arc<RequestHandler>) -> Router {
    let state = AppState {
        handler,
        card: Arc::new(card),
    };
    Router::new()
        .route(crate::AGENT_CARD_PATH, get(agent_card))
        .route("/rpc", post(rpc).get(rpc_get))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .with_state(state)
}

async fn agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

async fn rpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    Json(state.handler.handle(headers, request).await)
}

async fn rpc_get() -> Json<JsonRpcResponse> {
    Json(JsonRpcResponse::failure(
        None,
        RPC_METHOD_NOT_FOUND,
        "JSON-RPC requests must be sent via POST",
    ))
}
