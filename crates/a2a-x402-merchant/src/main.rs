//! Merchant server binary.
//!
//! Serves the demo image-generation agent with x402 payment support:
//!
//! ```bash
//! a2a-x402-merchant --port 8080 \
//!     --facilitator https://www.x402.org/facilitator \
//!     --config server_config.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use a2a_x402::networks::normalize_network;
use a2a_x402_evm::ExactEvmServer;
use a2a_x402_svm::ExactSvmServer;

use a2a_x402_merchant::config::ServerConfig;
use a2a_x402_merchant::demo::ImageService;
use a2a_x402_merchant::{
    FacilitatorConfig, HttpFacilitatorClient, PaymentOrchestrator, X402ResourceServer, server,
};

#[derive(Debug, Parser)]
#[command(name = "a2a-x402-merchant", about = "x402-enabled A2A merchant server")]
struct Args {
    /// Server port.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Facilitator URL for payment verification and settlement.
    #[arg(long, default_value = "https://www.x402.org/facilitator")]
    facilitator: String,

    /// Path to the server config file.
    #[arg(long, default_value = "server_config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Args::parse()).await {
        tracing::error!("merchant failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::load(&args.config)?;
    tracing::info!(
        facilitator = %args.facilitator,
        networks = config.network_configs.len(),
        "loaded configuration"
    );

    let facilitator = HttpFacilitatorClient::new(FacilitatorConfig::new(&args.facilitator))?;

    let mut resource_server = X402ResourceServer::new(Box::new(facilitator));
    for network_config in &config.network_configs {
        let network = normalize_network(&network_config.network_name);
        let Some((namespace, _)) = network.split_once(':') else {
            return Err(format!("invalid network identifier: {network}").into());
        };
        resource_server = match namespace {
            "eip155" => resource_server.with_scheme(&network, Box::new(ExactEvmServer::new())),
            "solana" => resource_server.with_scheme(&network, Box::new(ExactSvmServer::new())),
            other => return Err(format!("unsupported chain namespace: {other}").into()),
        };
        tracing::info!(network = %network, pay_to = %network_config.pay_to_address, "accepting payments");
    }

    let orchestrator = PaymentOrchestrator::new(
        Arc::new(resource_server),
        Arc::new(ImageService::new()),
        config.network_configs,
    );

    server::serve(args.port, Arc::new(orchestrator)).await
}
