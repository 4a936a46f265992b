//! Typed wrappers for the MultiChain calls used by the procurement workflow.
//!
//! Anything not covered here goes through `MultichainClient::call`.

use serde_json::{json, Value};

use crate::rpc::client::MultichainClient;
use crate::rpc::stream_query::StreamQueryOptions;
use crate::rpc::types::RpcResult;

/// Node error returned by `create` when the stream exists.
pub const STREAM_ALREADY_EXISTS: i64 = -705;

/// Build a positional parameter vector from heterogeneous values.
///
/// ```
/// use multichain_rpc::rpc_params;
/// let params = rpc_params!["procurement.documents", true, 10, -10];
/// assert_eq!(params.len(), 4);
/// ```
#[macro_export]
macro_rules! rpc_params {
    ($($param:expr),* $(,)?) => {
        vec![$(::serde_json::json!($param)),*]
    };
}

impl MultichainClient {
    pub async fn getinfo(&self) -> RpcResult<Value> {
        self.call("getinfo", Vec::new()).await
    }

    pub async fn getnewaddress(&self) -> RpcResult<String> {
        self.call_as("getnewaddress", Vec::new()).await
    }

    pub async fn getaddresses(&self) -> RpcResult<Vec<String>> {
        self.call_as("getaddresses", Vec::new()).await
    }

    /// Grant comma-separated `permissions` (e.g. "connect,send,receive") to `addresses`.
    pub async fn grant(&self, addresses: &[&str], permissions: &str) -> RpcResult<Value> {
        self.call("grant", vec![json!(addresses.join(",")), json!(permissions)])
            .await
    }

    /// `create stream <name> <open>`; returns the creation txid.
    pub async fn create_stream(&self, name: &str, open: bool) -> RpcResult<String> {
        self.call_as("create", vec![json!("stream"), json!(name), json!(open)])
            .await
    }

    /// Create `stream` (closed) unless it already exists, then subscribe to it.
    pub async fn provision_stream(&self, stream: &str) -> RpcResult<()> {
        match self.create_stream(stream, false).await {
            Ok(txid) => tracing::info!(stream = %stream, txid = %txid, "Stream created"),
            Err(e) if e.code() == STREAM_ALREADY_EXISTS => {
                tracing::info!(stream = %stream, "Stream already exists")
            }
            Err(e) => {
                tracing::error!(stream = %stream, code = e.code(), error = %e.message(), "Stream creation failed");
                return Err(e);
            }
        }

        self.subscribe(stream).await?;
        tracing::info!(stream = %stream, "Subscribed");
        Ok(())
    }

    pub async fn subscribe(&self, stream: &str) -> RpcResult<()> {
        self.call("subscribe", vec![json!(stream)]).await.map(|_| ())
    }

    pub async fn liststreams(&self) -> RpcResult<Vec<Value>> {
        self.call_as("liststreams", Vec::new()).await
    }

    /// Publish hex-encoded `data` under `key`; returns the txid.
    pub async fn publish(&self, stream: &str, key: &str, data_hex: &str) -> RpcResult<String> {
        self.call_as("publish", vec![json!(stream), json!(key), json!(data_hex)])
            .await
    }

    /// Publish a JSON document under `key`; returns the txid.
    pub async fn publish_json(&self, stream: &str, key: &str, data: &Value) -> RpcResult<String> {
        self.call_as(
            "publish",
            vec![json!(stream), json!(key), json!({ "json": data })],
        )
        .await
    }

    pub async fn list_stream_items(&self, options: &StreamQueryOptions) -> RpcResult<Vec<Value>> {
        self.call_as("liststreamitems", options.to_stream_items_params())
            .await
    }

    /// Fails with `RpcError::InvalidArgument` before any I/O when no key is set.
    pub async fn list_stream_key_items(&self, options: &StreamQueryOptions) -> RpcResult<Vec<Value>> {
        let params = options.to_stream_key_items_params()?;
        self.call_as("liststreamkeyitems", params).await
    }

    pub async fn list_stream_publisher_items(
        &self,
        options: &StreamQueryOptions,
    ) -> RpcResult<Vec<Value>> {
        let params = options.to_stream_publisher_items_params()?;
        self.call_as("liststreampublisheritems", params).await
    }
}
