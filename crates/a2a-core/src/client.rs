//! JSON-RPC client for talking to an A2A agent.
//!
//! Provides agent-card discovery and the two calls the payment loop
//! needs: `message/send` and `tasks/get`. Callers inject static headers
//! (e.g. `X-A2A-Extensions`) that are attached to every request.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use http::HeaderMap;

use crate::error::A2aError;
use crate::types::{
    AgentCard, JsonRpcRequest, JsonRpcResponse, Message, SendMessageResult, Task,
};

/// Timeout for fetching an agent card.
const AGENT_CARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches and decodes the agent card published under
/// [`AGENT_CARD_PATH`](crate::AGENT_CARD_PATH).
pub async fn fetch_agent_card(base_url: &str) -> Result<AgentCard, A2aError> {
    let url = format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        crate::AGENT_CARD_PATH
    );
    let client = reqwest::Client::builder()
        .timeout(AGENT_CARD_TIMEOUT)
        .build()?;
    let response = client.get(&url).send().await?.error_for_status()?;
    Ok(response.json::<AgentCard>().await?)
}

/// A JSON-RPC client bound to one agent endpoint.
///
/// The underlying HTTP client is long-lived; every call sends the headers
/// supplied at construction.
#[derive(Debug)]
pub struct A2aClient {
    endpoint: String,
    client: reqwest::Client,
    next_id: AtomicI64,
}

impl A2aClient {
    /// Creates a client for the given JSON-RPC endpoint.
    ///
    /// `headers` are attached to every outgoing request.
    pub fn new(endpoint: impl Into<String>, headers: HeaderMap) -> Result<Self, A2aError> {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
            next_id: AtomicI64::new(1),
        })
    }

    /// Returns the endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, A2aError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        let response: JsonRpcResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(A2aError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        response.result.ok_or(A2aError::UnexpectedResult)
    }

    /// Sends a message; the result is either a task or a direct message.
    pub async fn send_message(&self, message: &Message) -> Result<SendMessageResult, A2aError> {
        let params = serde_json::json!({ "message": message });
        let result = self.call("message/send", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Retrieves the current snapshot of a task.
    pub async fn get_task(&self, task_id: &str) -> Result<Task, A2aError> {
        let params = serde_json::json!({ "id": task_id });
        let result = self.call("tasks/get", params).await?;
        Ok(serde_json::from_value(result)?)
    }
}
