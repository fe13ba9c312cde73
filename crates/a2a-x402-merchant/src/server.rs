//! Agent card and HTTP serving glue.

use std::net::SocketAddr;
use std::sync::Arc;

use a2a_core::executor::AgentExecutor;
use a2a_core::server::{RequestHandler, router};
use a2a_core::types::{AgentCapabilities, AgentCard, AgentExtension, AgentSkill, TRANSPORT_JSONRPC};
use a2a_x402::X402_EXTENSION_URI;

/// Builds the merchant agent card, advertising the x402 extension as
/// required.
#[must_use]
pub fn agent_card(rpc_url: &str) -> AgentCard {
    AgentCard {
        name: "AI Image Generator".to_owned(),
        description: "An AI agent that generates images with payment support".to_owned(),
        url: rpc_url.to_owned(),
        version: "1.0.0".to_owned(),
        protocol_version: Some("0.2".to_owned()),
        preferred_transport: Some(TRANSPORT_JSONRPC.to_owned()),
        capabilities: AgentCapabilities {
            streaming: None,
            extensions: vec![AgentExtension {
                uri: X402_EXTENSION_URI.to_owned(),
                required: Some(true),
                description: None,
            }],
        },
        default_input_modes: vec!["text".to_owned()],
        default_output_modes: vec!["text".to_owned()],
        skills: vec![AgentSkill {
            name: "generate-image".to_owned(),
            description: "Generate an AI image based on a text prompt".to_owned(),
        }],
    }
}

/// Serves the merchant until Ctrl-C / SIGTERM.
pub async fn serve(
    port: u16,
    executor: Arc<dyn AgentExecutor>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let card = agent_card(&format!("http://localhost:{port}/rpc"));
    let handler = Arc::new(RequestHandler::new(executor));
    let app = router(card, handler);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("merchant listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("merchant shut down gracefully");
    Ok(())
}

/// Waits for Ctrl-C or SIGTERM (Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl-C");
        tracing::info!("received Ctrl-C, shutting down");
    }
}
