//! Client binary: sends a request to an x402 merchant and pays for it.
//!
//! ```bash
//! a2a-x402-client --merchant http://localhost:8080 \
//!     --message "Generate an image of a sunset" \
//!     --config client_config.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use a2a_x402_client::X402Client;
use a2a_x402_client::config::ClientConfig;

/// Overall deadline for one paid request, quote to completion.
const COMPLETION_DEADLINE: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Parser)]
#[command(name = "a2a-x402-client", about = "x402-paying A2A client")]
struct Args {
    /// Merchant server URL.
    #[arg(long, default_value = "http://localhost:8080")]
    merchant: String,

    /// Message to send to the merchant.
    #[arg(long, default_value = "Generate an image of a sunset")]
    message: String,

    /// Path to the client config file.
    #[arg(long, default_value = "client_config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Args::parse()).await {
        tracing::error!("client failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ClientConfig::load(&args.config)?;

    let client = X402Client::connect(&args.merchant, &config.network_key_pairs).await?;
    tracing::info!(merchant = %args.merchant, "connected");

    let task = tokio::time::timeout(
        COMPLETION_DEADLINE,
        client.wait_for_completion(&args.message),
    )
    .await
    .map_err(|_| "timed out waiting for task completion")??;

    let result = task
        .status
        .message
        .as_ref()
        .and_then(a2a_core::Message::first_text)
        .unwrap_or("<no result text>");
    tracing::info!(task_id = %task.id, state = %task.status.state, "task finished");
    println!("{result}");
    Ok(())
}
