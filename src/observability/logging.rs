//! Structured logging.
//!
//! `RUST_LOG` wins over the default filter when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for the binaries.
pub const DEFAULT_FILTER: &str = "multichain_rpc=info";

/// Install the global tracing subscriber. Later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
