//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! MultichainClient::call
//!     → tracing events (method, url, error code)   → logging.rs subscriber
//!     → metrics::record_rpc_call (count, latency)  → host's metrics recorder
//! ```
//!
//! # Design Decisions
//! - Credentials and payloads are never logged
//! - Subscriber setup belongs to binaries, the library only emits events

pub mod logging;
pub mod metrics;
