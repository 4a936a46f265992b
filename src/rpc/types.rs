//! RPC error model and last-call state.

use thiserror::Error;

use crate::transport::TransportError;

/// Code recorded when the node replied 2xx but the body was not a JSON-RPC envelope.
pub const MALFORMED_ENVELOPE: i64 = -2;

/// MultiChain's code for bad parameters; a blank line in the message precedes usage text.
pub const WRONG_PARAMETERS: i64 = -1;

/// Bitcoin-family code for an invalid parameter.
pub const INVALID_PARAMETER: i64 = -8;

/// Prefix applied to usage-help error messages.
pub const USAGE_PREFIX: &str = "Wrong parameters. Usage:\n\n";

/// Errors that can occur during a MultiChain RPC call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// No HTTP reply: connection refused, DNS, TLS, socket failure or timeout.
    #[error("Transport error {code}: {message}")]
    Transport { code: i64, message: String },

    /// Non-2xx reply without an RPC error body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Body was not valid JSON or lacked `error`/`result`.
    #[error("{message}")]
    MalformedEnvelope { message: String },

    /// Error reported by the node itself.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Call rejected before any I/O.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RpcError {
    pub fn invalid_json() -> Self {
        RpcError::MalformedEnvelope {
            message: "Invalid JSON Response".to_string(),
        }
    }

    pub fn invalid_structure() -> Self {
        RpcError::MalformedEnvelope {
            message: "Invalid Response Structure".to_string(),
        }
    }

    /// Build a node error, rewriting usage-help messages.
    pub fn from_node(code: i64, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if code == WRONG_PARAMETERS && message.contains("\n\n") {
            message = format!("{}{}", USAGE_PREFIX, message);
        }
        RpcError::Rpc { code, message }
    }

    /// Numeric code; never 0.
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Transport { code, .. } => *code,
            RpcError::Http { status, .. } => i64::from(*status),
            RpcError::MalformedEnvelope { .. } => MALFORMED_ENVELOPE,
            RpcError::Rpc { code, .. } => *code,
            RpcError::InvalidArgument(_) => INVALID_PARAMETER,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RpcError::Transport { message, .. }
            | RpcError::Http { message, .. }
            | RpcError::MalformedEnvelope { message }
            | RpcError::Rpc { message, .. }
            | RpcError::InvalidArgument(message) => message,
        }
    }

    /// Label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::Transport { .. } => "transport",
            RpcError::Http { .. } => "http",
            RpcError::MalformedEnvelope { .. } => "malformed",
            RpcError::Rpc { .. } => "rpc",
            RpcError::InvalidArgument(_) => "invalid_argument",
        }
    }
}

impl From<TransportError> for RpcError {
    fn from(e: TransportError) -> Self {
        RpcError::Transport {
            code: e.code,
            message: e.message,
        }
    }
}

impl From<InvalidArgument> for RpcError {
    fn from(e: InvalidArgument) -> Self {
        RpcError::InvalidArgument(e.0)
    }
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Outcome of the most recent call: `code == 0` iff it succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    pub code: i64,
    pub message: String,
}

impl ErrorState {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

impl From<&RpcError> for ErrorState {
    fn from(e: &RpcError) -> Self {
        Self {
            code: e.code(),
            message: e.message().to_string(),
        }
    }
}

/// A caller passed arguments that can never be valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidArgument(pub String);
