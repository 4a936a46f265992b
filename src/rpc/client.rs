//! MultiChain RPC client.
//!
//! # Responsibilities
//! - Turn a method name and positional params into a JSON-RPC payload
//! - Add Basic auth and JSON headers, delegate I/O to a `Transport`
//! - Normalize transport, HTTP, envelope and node errors into `RpcError`
//! - Remember the outcome of the last call for callers that poll it

use std::sync::Mutex;
use std::time::Instant;

use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ConfigError, ConnectionConfig};
use crate::observability::metrics;
use crate::rpc::envelope::{parse_response, RpcRequest};
use crate::rpc::types::{ErrorState, RpcError, RpcResult};
use crate::transport::{create_transport, Transport, TransportOptions};

/// Client for one MultiChain node.
///
/// Calls do not share state except the last-error record, which reflects
/// whichever call completed most recently. Callers that need per-call
/// errors should use the returned `Result`.
pub struct MultichainClient {
    config: ConnectionConfig,
    transport: Box<dyn Transport>,
    last_error: Mutex<ErrorState>,
}

impl MultichainClient {
    /// Create a client using the transport selected by `config`.
    pub fn new(config: ConnectionConfig) -> Result<Self, ConfigError> {
        let transport = create_transport(
            config.transport(),
            &TransportOptions::from_connection(&config),
        )?;

        tracing::info!(
            url = %config.url(),
            transport = %config.transport(),
            chain_name = ?config.chain_name(),
            "MultiChain client initialized"
        );

        Ok(Self::from_parts(config, transport))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: ConnectionConfig, transport: impl Transport + 'static) -> Self {
        Self::from_parts(config, Box::new(transport))
    }

    pub fn from_parts(config: ConnectionConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            last_error: Mutex::new(ErrorState::default()),
        }
    }

    /// Swap the transport used for subsequent calls.
    pub fn set_transport(&mut self, transport: Box<dyn Transport>) {
        self.transport = transport;
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Target URL, `scheme://host:port/`.
    pub fn url(&self) -> String {
        self.config.url()
    }

    /// Build the request envelope for `method`.
    pub fn request(&self, method: &str, params: Vec<Value>) -> RpcRequest {
        RpcRequest::new(method, params, self.config.chain_name().map(str::to_owned))
    }

    /// Header lines sent with `payload`.
    pub fn headers(&self, payload: &str) -> Vec<String> {
        let credentials = format!("{}:{}", self.config.username(), self.config.password());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());

        vec![
            "Content-Type: application/json".to_string(),
            format!("Content-Length: {}", payload.len()),
            "Connection: close".to_string(),
            format!("Authorization: Basic {}", encoded),
        ]
    }

    /// Invoke `method` with positional `params` and return the node's `result`.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        let payload = self.request(method, params).to_json();
        let headers = self.headers(&payload);
        let url = self.url();

        tracing::debug!(method, url = %url, "MultiChain RPC call");
        let started = Instant::now();

        let result = match self.transport.execute(&url, &headers, &payload).await {
            Ok(response) => parse_response(&response),
            Err(e) => Err(RpcError::from(e)),
        };

        match &result {
            Ok(_) => metrics::record_rpc_call(method, "ok", started),
            Err(e) => {
                metrics::record_rpc_call(method, e.kind(), started);
                tracing::debug!(method, code = e.code(), error = %e.message(), "MultiChain RPC call failed");
            }
        }

        self.record(result.as_ref().err());
        result
    }

    /// Invoke `method` and deserialize the result into `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> RpcResult<T> {
        let value = self.call(method, params).await?;
        serde_json::from_value(value).map_err(|e| {
            let err = RpcError::MalformedEnvelope {
                message: format!("Unexpected result for {}: {}", method, e),
            };
            self.record(Some(&err));
            err
        })
    }

    /// Outcome of the most recently completed call.
    pub fn last_error(&self) -> ErrorState {
        self.last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn error_code(&self) -> i64 {
        self.last_error().code
    }

    pub fn error_message(&self) -> String {
        self.last_error().message
    }

    /// True iff the last call's error code is 0.
    pub fn success(&self) -> bool {
        self.last_error().is_success()
    }

    fn record(&self, error: Option<&RpcError>) {
        let state = error.map(ErrorState::from).unwrap_or_default();
        *self
            .last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }
}

impl std::fmt::Debug for MultichainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultichainClient")
            .field("url", &self.config.url())
            .field("transport", &self.config.transport())
            .field("chain_name", &self.config.chain_name())
            .finish()
    }
}
