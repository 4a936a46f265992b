//! MultiChain JSON-RPC client library.

pub mod config;
pub mod observability;
pub mod rpc;
pub mod transport;

pub use config::{ConnectionConfig, MultichainConfig};
pub use rpc::{MultichainClient, RpcError, StreamQueryOptions};
pub use transport::{Transport, TransportKind};
