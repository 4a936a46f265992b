//! Transport selection.

use std::time::Duration;

use crate::config::{ConfigError, ConnectionConfig};
use crate::transport::{HttpTransport, SocketTransport, Transport, TransportKind};

/// Options applied when constructing a transport.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// TLS verification for the HTTP transport; ignored by the socket transport.
    pub verify_ssl: Option<bool>,
    pub timeout: Option<Duration>,
}

impl TransportOptions {
    pub fn from_connection(config: &ConnectionConfig) -> Self {
        Self {
            verify_ssl: Some(config.verify_ssl()),
            timeout: config.timeout(),
        }
    }
}

/// Construct the transport for `kind`.
pub fn create_transport(
    kind: TransportKind,
    options: &TransportOptions,
) -> Result<Box<dyn Transport>, ConfigError> {
    tracing::debug!(transport = %kind, "Creating RPC transport");

    match kind {
        TransportKind::Socket => {
            let mut transport = SocketTransport::new();
            if let Some(limit) = options.timeout {
                transport = transport.with_timeout(limit);
            }
            Ok(Box::new(transport))
        }
        TransportKind::Http => {
            let verify_ssl = options.verify_ssl.unwrap_or(true);
            let transport = HttpTransport::with_options(verify_ssl, options.timeout)
                .map_err(|e| ConfigError::Transport(e.message))?;
            Ok(Box::new(transport))
        }
    }
}

/// Construct a transport from its configuration tag (`"socket"` or `"curl"`).
pub fn create_transport_named(
    tag: &str,
    options: &TransportOptions,
) -> Result<Box<dyn Transport>, ConfigError> {
    let kind: TransportKind = tag.parse()?;
    create_transport(kind, options)
}
