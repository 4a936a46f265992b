//! MultiChain stream provisioning.
//!
//! Loads the node configuration, checks that the node answers, then
//! creates and subscribes to every configured stream. Re-running is safe:
//! streams that already exist are only subscribed.

use std::path::PathBuf;

use clap::Parser;

use multichain_rpc::config::load_or_default;
use multichain_rpc::observability::logging;
use multichain_rpc::{ConnectionConfig, MultichainClient};

#[derive(Parser)]
#[command(name = "multichain-rpc")]
#[command(about = "Provision MultiChain streams for the procurement workflow", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults plus MULTICHAIN_* variables when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra stream to provision (repeatable).
    #[arg(long = "stream")]
    streams: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing(logging::DEFAULT_FILTER);

    tracing::info!("multichain-rpc v0.1.0 starting");

    let args = Args::parse();
    let mut config = load_or_default(args.config.as_deref())?;
    config.streams.extend(args.streams);

    let client = MultichainClient::new(ConnectionConfig::from_config(&config)?)?;

    let info = client.getinfo().await?;
    tracing::info!(
        chain = %info["chainname"],
        version = %info["version"],
        "Connected to MultiChain node"
    );

    for stream in &config.streams {
        client.provision_stream(stream).await?;
    }

    tracing::info!(streams = config.streams.len(), "Setup complete");
    Ok(())
}
