use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use multichain_rpc::config::load_or_default;
use multichain_rpc::observability::logging;
use multichain_rpc::rpc::RpcResult;
use multichain_rpc::{ConnectionConfig, MultichainClient, StreamQueryOptions};

#[derive(Parser)]
#[command(name = "multichain-cli")]
#[command(about = "Issue JSON-RPC calls against a MultiChain node", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults plus MULTICHAIN_* variables when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call any RPC method; params are parsed as JSON, falling back to strings
    Call {
        method: String,
        #[arg(allow_hyphen_values = true)]
        params: Vec<String>,
    },
    /// Show node info
    Info,
    /// List stream items, optionally filtered by key or publisher
    Items {
        stream: String,
        #[arg(long, conflicts_with = "publisher")]
        key: Option<String>,
        #[arg(long)]
        publisher: Option<String>,
        #[arg(long, default_value_t = 10)]
        count: i64,
        #[arg(long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing("multichain_rpc=warn");

    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    let client = MultichainClient::new(ConnectionConfig::from_config(&config)?)?;

    let result = match cli.command {
        Commands::Call { method, params } => {
            let params = params.iter().map(|raw| parse_param(raw)).collect::<Vec<_>>();
            client.call(&method, params).await
        }
        Commands::Info => client.getinfo().await,
        Commands::Items {
            stream,
            key,
            publisher,
            count,
            verbose,
        } => list_items(&client, stream, key, publisher, count, verbose).await,
    };

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("error {}: {}", e.code(), e.message());
            std::process::exit(1);
        }
    }
}

async fn list_items(
    client: &MultichainClient,
    stream: String,
    key: Option<String>,
    publisher: Option<String>,
    count: i64,
    verbose: bool,
) -> RpcResult<Value> {
    let items = match (key, publisher) {
        (Some(key), _) => {
            let options = StreamQueryOptions::for_key(stream, key).count(count).verbose(verbose);
            client.list_stream_key_items(&options).await?
        }
        (None, Some(address)) => {
            let options = StreamQueryOptions::for_publisher(stream, address)
                .count(count)
                .verbose(verbose);
            client.list_stream_publisher_items(&options).await?
        }
        (None, None) => {
            let options = StreamQueryOptions::new(stream).count(count).verbose(verbose);
            client.list_stream_items(&options).await?
        }
    };
    Ok(Value::Array(items))
}

/// `10` → number, `true` → bool, `{"a":1}` → object, anything else → string.
fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
