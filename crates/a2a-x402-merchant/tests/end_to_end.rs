//! Full-stack handshake tests: a real merchant served over HTTP, a real
//! paying client, and a stubbed facilitator.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use a2a_core::server::{RequestHandler, router};
use a2a_core::types::TaskState;
use a2a_x402::config::{NetworkConfig, NetworkKeyPair};
use a2a_x402::state::extract;
use a2a_x402_evm::ExactEvmServer;
use a2a_x402_merchant::demo::ImageService;
use a2a_x402_merchant::server::agent_card;
use a2a_x402_merchant::{
    FacilitatorConfig, HttpFacilitatorClient, PaymentOrchestrator, X402ResourceServer,
};
use a2a_x402_client::{ClientError, X402Client};

const EVM_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Spins up a merchant wired to the given facilitator and returns its
/// base URL.
async fn start_merchant(facilitator_url: &str) -> SocketAddr {
    let facilitator =
        HttpFacilitatorClient::new(FacilitatorConfig::new(facilitator_url)).unwrap();
    let resource_server = X402ResourceServer::new(Box::new(facilitator))
        .with_scheme("eip155:84532", Box::new(ExactEvmServer::new()));
    let orchestrator = PaymentOrchestrator::new(
        Arc::new(resource_server),
        Arc::new(ImageService::new()),
        vec![NetworkConfig {
            network_name: "base-sepolia".to_owned(),
            pay_to_address: "0x1111111111111111111111111111111111111111".to_owned(),
        }],
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let card = agent_card(&format!("http://{addr}/rpc"));
    let handler = Arc::new(RequestHandler::new(Arc::new(orchestrator)));
    let app = router(card, handler);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

fn key_pairs() -> Vec<NetworkKeyPair> {
    vec![NetworkKeyPair {
        network_name: "base-sepolia".to_owned(),
        private_key: EVM_KEY.to_owned(),
    }]
}

#[tokio::test]
async fn happy_path_settles_on_base_sepolia() {
    let facilitator = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "isValid": true,
            "payer": "0x1234567890123456789012345678901234567890",
        })))
        .expect(1)
        .mount(&facilitator)
        .await;
    Mock::given(method("POST"))
        .and(path("/settle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "transaction": "0xdeadbeef",
            "network": "eip155:84532",
            "payer": "0x1234567890123456789012345678901234567890",
        })))
        .expect(1)
        .mount(&facilitator)
        .await;

    let merchant = start_merchant(&facilitator.uri()).await;
    let client = X402Client::connect(&format!("http://{merchant}"), &key_pairs())
        .await
        .unwrap();

    let task = tokio::time::timeout(
        Duration::from_secs(15),
        client.wait_for_completion("Generate an image of a sunset"),
    )
    .await
    .expect("did not reach a terminal state in time")
    .unwrap();

    assert_eq!(task.status.state, TaskState::Completed);

    let receipts = extract::extract_receipts(&task).unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].transaction, "0xdeadbeef");

    // Replay guard: the terminal status message carries neither the
    // payload nor the quote.
    let metadata = task.status.message.as_ref().unwrap().metadata.as_ref().unwrap();
    assert!(!metadata.contains_key(a2a_x402::METADATA_KEY_PAYLOAD));
    assert!(!metadata.contains_key(a2a_x402::METADATA_KEY_REQUIRED));

    let result: serde_json::Value =
        serde_json::from_str(task.status.message.as_ref().unwrap().first_text().unwrap()).unwrap();
    assert_eq!(result["status"], "success");
    assert_eq!(result["prompt"], "Generate an image of a sunset");
}

#[tokio::test]
async fn rejected_verification_surfaces_the_reason() {
    let facilitator = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "isValid": false,
            "invalidReason": "insufficient_funds",
            "invalidMessage": "balance too low",
        })))
        .mount(&facilitator)
        .await;
    Mock::given(method("POST"))
        .and(path("/settle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "transaction": "0x0",
            "network": "eip155:84532",
        })))
        .expect(0)
        .mount(&facilitator)
        .await;

    let merchant = start_merchant(&facilitator.uri()).await;
    let client = X402Client::connect(&format!("http://{merchant}"), &key_pairs())
        .await
        .unwrap();

    let err = tokio::time::timeout(
        Duration::from_secs(15),
        client.wait_for_completion("Generate an image of a sunset"),
    )
    .await
    .expect("did not reach a terminal state in time")
    .unwrap_err();

    match err {
        ClientError::PaymentFailed(detail) => assert!(detail.contains("insufficient_funds")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_extension_header_is_rejected_on_the_first_pass() {
    let facilitator = MockServer::start().await;
    let merchant = start_merchant(&facilitator.uri()).await;

    // A bare JSON-RPC client that never sends X-A2A-Extensions.
    let a2a = a2a_core::client::A2aClient::new(
        format!("http://{merchant}/rpc"),
        http::HeaderMap::new(),
    )
    .unwrap();

    let message = a2a_core::types::Message::new(
        a2a_core::types::Role::User,
        a2a_core::types::Part::text("Generate an image of a sunset"),
    );
    let err = a2a.send_message(&message).await.unwrap_err();
    assert!(err.to_string().contains("x402 extension is required"));
}
