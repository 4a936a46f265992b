//! Configuration schema definitions.
//!
//! This module defines the configuration mapping consumed by the RPC client.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::rpc::types::InvalidArgument;
use crate::transport::TransportKind;

/// Root configuration for a MultiChain node connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MultichainConfig {
    /// Endpoint and credentials.
    pub rpc: RpcConfig,

    /// Connect over TLS.
    pub use_ssl: bool,

    /// Verify the node's TLS certificate (HTTP transport only).
    pub verify_ssl: bool,

    /// Chain name sent with every request, if set.
    pub chain_name: Option<String>,

    /// Transport tag ("socket" or "curl"). Derived from `use_ssl` when absent.
    pub transport: Option<String>,

    /// Optional bound on a whole RPC exchange, in seconds.
    pub timeout_secs: Option<u64>,

    /// Streams provisioned by the setup binary.
    pub streams: Vec<String>,
}

impl MultichainConfig {
    /// Resolve the transport tag; unknown tags are an `InvalidArgument`.
    pub fn transport_kind(&self) -> Result<TransportKind, InvalidArgument> {
        match &self.transport {
            Some(tag) => tag.parse(),
            None => Ok(TransportKind::default_for(self.use_ssl)),
        }
    }
}

impl Default for MultichainConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            use_ssl: false,
            verify_ssl: true,
            chain_name: None,
            transport: None,
            timeout_secs: None,
            streams: Vec::new(),
        }
    }
}

/// `rpc.*` section of the configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    pub host: String,

    /// Accepts an integer or a numeric string.
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,

    pub username: String,

    pub password: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2778,
            username: "multichainrpc".to_string(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port '{}'", text))),
    }
}

/// Immutable connection parameters for one MultiChain node.
///
/// Built once at startup; no validation beyond type coercion, so a bad
/// host or credential surfaces later as a failed call.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    username: String,
    password: String,
    use_ssl: bool,
    chain_name: Option<String>,
    verify_ssl: bool,
    transport: TransportKind,
    timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Create a config for a plain-HTTP node using the socket transport.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            use_ssl: false,
            chain_name: None,
            verify_ssl: true,
            transport: TransportKind::Socket,
            timeout: None,
        }
    }

    /// Extract connection parameters from the configuration mapping.
    pub fn from_config(config: &MultichainConfig) -> Result<Self, InvalidArgument> {
        let transport = config.transport_kind()?;

        Ok(Self {
            host: config.rpc.host.clone(),
            port: config.rpc.port,
            username: config.rpc.username.clone(),
            password: config.rpc.password.clone(),
            use_ssl: config.use_ssl,
            chain_name: config.chain_name.clone().filter(|name| !name.is_empty()),
            verify_ssl: config.verify_ssl,
            transport,
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }

    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    pub fn with_chain_name(mut self, chain_name: impl Into<String>) -> Self {
        self.chain_name = Some(chain_name.into());
        self
    }

    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    pub fn chain_name(&self) -> Option<&str> {
        self.chain_name.as_deref()
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `scheme://host:port/` for this node.
    pub fn url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}/", scheme, self.host, self.port)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_ssl", &self.use_ssl)
            .field("chain_name", &self.chain_name)
            .field("verify_ssl", &self.verify_ssl)
            .field("transport", &self.transport)
            .field("timeout", &self.timeout)
            .finish()
    }
}
