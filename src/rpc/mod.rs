//! MultiChain JSON-RPC subsystem.
//!
//! # Data Flow
//! ```text
//! caller: call("liststreamitems", params) or a typed wrapper (methods.rs)
//!     → envelope.rs  RpcRequest { id, method, params, chain_name? } → JSON
//!     → client.rs    headers (Basic auth), url, Transport::execute
//!     → envelope.rs  status / JSON / structure / node error checks
//!     → Result<Value, RpcError>, mirrored into the client's last-error state
//! ```
//!
//! # Error Codes
//! - `0`: last call succeeded
//! - `502` / `504`: transport could not get a reply
//! - HTTP status: non-2xx reply without an RPC error body
//! - `-2`: 2xx reply that is not a JSON-RPC envelope
//! - anything else: the node's own error code

pub mod client;
pub mod envelope;
pub mod methods;
pub mod stream_query;
pub mod types;

pub use client::MultichainClient;
pub use envelope::RpcRequest;
pub use methods::STREAM_ALREADY_EXISTS;
pub use stream_query::StreamQueryOptions;
pub use types::{ErrorState, InvalidArgument, RpcError, RpcResult};
