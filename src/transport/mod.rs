//! Transport subsystem: delivering one HTTP-shaped request to a node.
//!
//! # Data Flow
//! ```text
//! MultichainClient (url, header lines, JSON payload)
//!     → Transport::execute
//!         → socket.rs (raw TCP, hand-written HTTP/1.1 framing)
//!         → http.rs   (reqwest client, optional TLS verification bypass)
//!     → TransportResponse { status, reason, body }   any HTTP reply
//!     → TransportError { code, message }             no usable reply
//! ```
//!
//! # Design Decisions
//! - A transport never panics on network failure; it returns an error and
//!   records it for `last_error()`
//! - One connection per call, `Connection: close`, no pooling
//! - Selection is a closed enum, see `factory.rs`

pub mod factory;
pub mod http;
pub mod socket;

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::rpc::types::InvalidArgument;

pub use factory::{create_transport, create_transport_named, TransportOptions};
pub use http::HttpTransport;
pub use socket::SocketTransport;

/// Code used when no connection could be made or the reply could not be framed.
pub const BAD_GATEWAY: i64 = 502;

/// Code used when the configured exchange timeout elapsed.
pub const GATEWAY_TIMEOUT: i64 = 504;

/// Raw HTTP reply from the node. Produced per call and consumed immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase (e.g. "Forbidden").
    pub reason: String,
    /// Response body, lossily decoded as UTF-8.
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// `200 <= status < 300`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any HTTP reply, or a non-2xx reply as recorded by `last_error()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct TransportError {
    pub code: i64,
    pub message: String,
}

impl TransportError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unable_to_connect() -> Self {
        Self::new(BAD_GATEWAY, "Unable to Connect")
    }

    pub fn invalid_response() -> Self {
        Self::new(BAD_GATEWAY, "Invalid Response")
    }

    pub fn timed_out(limit: Duration) -> Self {
        Self::new(
            GATEWAY_TIMEOUT,
            format!("Request timed out after {} ms", limit.as_millis()),
        )
    }

    /// Error describing a non-2xx reply.
    pub fn from_status(response: &TransportResponse) -> Self {
        Self::new(i64::from(response.status), response.reason.clone())
    }
}

/// Sends one HTTP-shaped request and returns the raw reply.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `payload` to `url` with the given `Name: value` header lines.
    ///
    /// Returns `Ok` for any HTTP reply, including non-2xx statuses.
    async fn execute(
        &self,
        url: &str,
        headers: &[String],
        payload: &str,
    ) -> Result<TransportResponse, TransportError>;

    /// Error recorded by the most recent `execute`, `None` if it got a 2xx reply.
    fn last_error(&self) -> Option<TransportError>;
}

/// Available transport strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Raw TCP socket, plain HTTP only.
    Socket,
    /// General-purpose HTTP client with TLS support.
    Http,
}

impl TransportKind {
    /// The socket transport cannot speak TLS, so SSL implies the HTTP client.
    pub fn default_for(use_ssl: bool) -> Self {
        if use_ssl {
            TransportKind::Http
        } else {
            TransportKind::Socket
        }
    }
}

impl FromStr for TransportKind {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "socket" => Ok(TransportKind::Socket),
            "curl" | "http" => Ok(TransportKind::Http),
            other => Err(InvalidArgument(format!("Unknown transport type: {}", other))),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Socket => write!(f, "socket"),
            TransportKind::Http => write!(f, "curl"),
        }
    }
}

/// Split a `Name: value` header line.
pub(crate) fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

/// Standard reason phrase for a status code, empty when unknown.
pub(crate) fn canonical_reason(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
        .to_string()
}

/// Per-transport record of the last failure.
#[derive(Debug, Default)]
pub(crate) struct LastError(Mutex<Option<TransportError>>);

impl LastError {
    pub(crate) fn record(&self, result: &Result<TransportResponse, TransportError>) {
        let error = match result {
            Ok(response) if response.is_success() => None,
            Ok(response) => Some(TransportError::from_status(response)),
            Err(e) => Some(e.clone()),
        };
        *self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = error;
    }

    pub(crate) fn get(&self) -> Option<TransportError> {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
