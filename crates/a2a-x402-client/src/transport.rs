//! Agent-card discovery and extension header injection.

use http::header::{HeaderMap, HeaderValue};

use a2a_core::client::{A2aClient, fetch_agent_card};
use a2a_core::error::A2aError;
use a2a_core::types::{AgentCard, TRANSPORT_JSONRPC};

use crate::error::ClientError;

/// Connects to a merchant: fetches its agent card, collects the
/// advertised extension URIs, and builds a JSON-RPC client that sends
/// them in the `X-A2A-Extensions` header on every call.
pub async fn connect(merchant_url: &str) -> Result<A2aClient, ClientError> {
    let card = fetch_agent_card(merchant_url).await?;

    let uris: Vec<&str> = card
        .capabilities
        .extensions
        .iter()
        .map(|ext| ext.uri.as_str())
        .filter(|uri| !uri.is_empty())
        .collect();
    if uris.is_empty() {
        return Err(ClientError::Transport(A2aError::AgentCard(
            "no extensions found in agent card".to_owned(),
        )));
    }

    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&uris.join(", ")).map_err(|e| {
        ClientError::Transport(A2aError::AgentCard(format!("invalid extension URI: {e}")))
    })?;
    headers.insert(a2a_core::EXTENSIONS_HEADER, value);

    let endpoint = rpc_endpoint(merchant_url, &card);
    tracing::debug!(endpoint = %endpoint, extensions = uris.len(), "connecting to merchant");
    Ok(A2aClient::new(endpoint, headers)?)
}

/// Resolves the RPC endpoint: the card's URL when it prefers JSON-RPC,
/// otherwise `{merchant_url}/rpc`.
fn rpc_endpoint(merchant_url: &str, card: &AgentCard) -> String {
    if !card.url.is_empty() && card.preferred_transport.as_deref() == Some(TRANSPORT_JSONRPC) {
        return card.url.clone();
    }
    format!("{}/rpc", merchant_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2a_core::types::{AgentCapabilities, AgentExtension};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn card(url: &str, transport: Option<&str>, extensions: Vec<AgentExtension>) -> AgentCard {
        AgentCard {
            name: "Merchant".to_owned(),
            description: "test".to_owned(),
            url: url.to_owned(),
            version: "1.0.0".to_owned(),
            protocol_version: Some("0.2".to_owned()),
            preferred_transport: transport.map(str::to_owned),
            capabilities: AgentCapabilities {
                streaming: None,
                extensions,
            },
            default_input_modes: vec![],
            default_output_modes: vec![],
            skills: vec![],
        }
    }

    fn x402_extension() -> AgentExtension {
        AgentExtension {
            uri: a2a_x402::X402_EXTENSION_URI.to_owned(),
            required: Some(true),
            description: None,
        }
    }

    #[test]
    fn rpc_endpoint_prefers_card_url_for_jsonrpc() {
        let c = card("http://merchant.example/rpc", Some(TRANSPORT_JSONRPC), vec![]);
        assert_eq!(
            rpc_endpoint("http://merchant.example", &c),
            "http://merchant.example/rpc"
        );

        let c = card("http://merchant.example/grpc", Some("GRPC"), vec![]);
        assert_eq!(
            rpc_endpoint("http://merchant.example/", &c),
            "http://merchant.example/rpc"
        );

        let c = card("", Some(TRANSPORT_JSONRPC), vec![]);
        assert_eq!(
            rpc_endpoint("http://merchant.example", &c),
            "http://merchant.example/rpc"
        );
    }

    #[tokio::test]
    async fn connect_requires_at_least_one_extension() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/agent-card.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(card(
                &format!("{}/rpc", server.uri()),
                Some(TRANSPORT_JSONRPC),
                vec![],
            )))
            .mount(&server)
            .await;

        let err = connect(&server.uri()).await.unwrap_err();
        assert!(err.to_string().contains("no extensions"));
    }

    #[tokio::test]
    async fn connect_builds_a_client_for_the_card_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/agent-card.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(card(
                &format!("{}/rpc", server.uri()),
                Some(TRANSPORT_JSONRPC),
                vec![x402_extension()],
            )))
            .mount(&server)
            .await;

        let client = connect(&server.uri()).await.unwrap();
        assert_eq!(client.endpoint(), format!("{}/rpc", server.uri()));
    }
}
