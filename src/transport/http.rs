//! HTTP client transport backed by `reqwest`.
//!
//! Supports TLS. Certificate verification can be switched off for
//! self-signed chain nodes; it is on unless configured otherwise.

use std::time::Duration;

use async_trait::async_trait;

use crate::transport::{
    canonical_reason, split_header, LastError, Transport, TransportError, TransportResponse,
    BAD_GATEWAY, GATEWAY_TIMEOUT,
};

/// Transport using a general-purpose HTTP client.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    verify_ssl: bool,
    last_error: LastError,
}

impl HttpTransport {
    /// Create a transport with certificate verification enabled.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_options(true, None)
    }

    /// Create a transport with explicit TLS verification and timeout settings.
    pub fn with_options(verify_ssl: bool, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);

        if !verify_ssl {
            tracing::warn!("TLS certificate verification disabled for MultiChain RPC");
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::new(BAD_GATEWAY, format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            verify_ssl,
            last_error: LastError::default(),
        })
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    async fn send(
        &self,
        url: &str,
        headers: &[String],
        payload: &str,
    ) -> Result<TransportResponse, TransportError> {
        let mut request = self.client.post(url).body(payload.to_owned());
        for line in headers {
            let Some((name, value)) = split_header(line) else {
                continue;
            };
            // reqwest derives the length from the body.
            if name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| map_reqwest_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Failed to read RPC response body");
            TransportError::invalid_response()
        })?;

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: canonical_reason(status.as_u16()),
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        url: &str,
        headers: &[String],
        payload: &str,
    ) -> Result<TransportResponse, TransportError> {
        let result = self.send(url, headers, payload).await;
        if let Err(e) = &result {
            tracing::warn!(url = %url, code = e.code, error = %e.message, "HTTP transport failure");
        }

        self.last_error.record(&result);
        result
    }

    fn last_error(&self) -> Option<TransportError> {
        self.last_error.get()
    }
}

fn map_reqwest_error(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::new(GATEWAY_TIMEOUT, format!("Request timed out: {}", e))
    } else if e.is_connect() {
        TransportError::new(BAD_GATEWAY, format!("Unable to Connect: {}", e))
    } else {
        TransportError::new(BAD_GATEWAY, e.to_string())
    }
}
