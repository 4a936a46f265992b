//! Raw TCP transport with hand-written HTTP/1.1 framing.
//!
//! # Responsibilities
//! - Open a plain TCP connection per call (no TLS)
//! - Write the POST request line, headers and body
//! - Read until the peer closes, split head from body on the first blank line
//!
//! Without a configured timeout a silent peer blocks the call indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use url::Url;

use crate::transport::{
    canonical_reason, split_header, LastError, Transport, TransportError, TransportResponse,
};

/// Headers the transport writes itself.
const FRAMING_HEADERS: [&str; 3] = ["host", "content-length", "connection"];

/// Transport speaking HTTP/1.1 directly over a `TcpStream`.
#[derive(Debug, Default)]
pub struct SocketTransport {
    timeout: Option<Duration>,
    last_error: LastError,
}

impl SocketTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the whole exchange (connect, write, read).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn exchange(
        &self,
        url: &str,
        headers: &[String],
        payload: &str,
    ) -> Result<TransportResponse, TransportError> {
        let target = Url::parse(url).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Unparseable RPC URL");
            TransportError::unable_to_connect()
        })?;
        let host = target
            .host_str()
            .ok_or_else(TransportError::unable_to_connect)?;
        let port = target.port_or_known_default().unwrap_or(80);
        let connect_host = host.trim_start_matches('[').trim_end_matches(']');

        let mut stream = TcpStream::connect((connect_host, port)).await.map_err(|e| {
            tracing::warn!(host = %host, port, error = %e, "Socket connect failed");
            TransportError::unable_to_connect()
        })?;

        let request = build_request(&target, host, port, headers, payload);
        stream.write_all(request.as_bytes()).await.map_err(|e| {
            tracing::warn!(host = %host, port, error = %e, "Socket write failed");
            TransportError::unable_to_connect()
        })?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.map_err(|e| {
            tracing::warn!(host = %host, port, error = %e, "Socket read failed");
            TransportError::invalid_response()
        })?;

        parse_response(&raw)
    }
}

#[async_trait]
impl Transport for SocketTransport {
    async fn execute(
        &self,
        url: &str,
        headers: &[String],
        payload: &str,
    ) -> Result<TransportResponse, TransportError> {
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(url, headers, payload))
                .await
                .unwrap_or_else(|_| Err(TransportError::timed_out(limit))),
            None => self.exchange(url, headers, payload).await,
        };

        self.last_error.record(&result);
        result
    }

    fn last_error(&self) -> Option<TransportError> {
        self.last_error.get()
    }
}

/// Serialize a POST request. Framing headers from the caller are replaced.
pub(crate) fn build_request(
    target: &Url,
    host: &str,
    port: u16,
    headers: &[String],
    payload: &str,
) -> String {
    let mut path = target.path().to_string();
    if let Some(query) = target.query() {
        path.push('?');
        path.push_str(query);
    }

    let mut request = format!("POST {} HTTP/1.1\r\nHost: {}:{}\r\n", path, host, port);
    for line in headers {
        let is_framing = split_header(line)
            .map(|(name, _)| FRAMING_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h)))
            .unwrap_or(false);
        if is_framing {
            continue;
        }
        request.push_str(line);
        request.push_str("\r\n");
    }
    request.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    request.push_str("Connection: close\r\n\r\n");
    request.push_str(payload);
    request
}

/// Parse a complete HTTP/1.x reply read up to EOF.
pub(crate) fn parse_response(raw: &[u8]) -> Result<TransportResponse, TransportError> {
    let split = raw
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .ok_or_else(TransportError::invalid_response)?;

    let head = String::from_utf8_lossy(&raw[..split]);
    let mut body = raw[split + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let (status, reason) = lines
        .next()
        .and_then(parse_status_line)
        .unwrap_or_else(|| (200, String::new()));

    let mut chunked = false;
    let mut content_length = None;
    for line in lines {
        let Some((name, value)) = split_header(line) else {
            continue;
        };
        if name.eq_ignore_ascii_case("transfer-encoding") {
            chunked = value.to_ascii_lowercase().contains("chunked");
        } else if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().ok();
        }
    }

    if chunked {
        body = decode_chunked(&body).ok_or_else(TransportError::invalid_response)?;
    } else if let Some(length) = content_length {
        body.truncate(length);
    }

    let reason = if reason.is_empty() {
        canonical_reason(status)
    } else {
        reason
    };

    Ok(TransportResponse {
        status,
        reason,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// `HTTP/1.x <code> <reason>` → (code, reason).
fn parse_status_line(line: &str) -> Option<(u16, String)> {
    let mut parts = line.splitn(3, ' ');
    if !parts.next()?.starts_with("HTTP/1.") {
        return None;
    }
    let code: u16 = parts.next()?.trim().parse().ok()?;
    if !(100..1000).contains(&code) {
        return None;
    }
    let reason = parts.next().unwrap_or("").trim().to_string();
    Some((code, reason))
}

fn decode_chunked(mut rest: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let line_end = rest.windows(2).position(|window| window == b"\r\n")?;
        let size_line = std::str::from_utf8(&rest[..line_end]).ok()?;
        let size_hex = size_line.split(';').next()?.trim();
        let size = usize::from_str_radix(size_hex, 16).ok()?;
        rest = &rest[line_end + 2..];

        if size == 0 {
            return Some(out);
        }
        if rest.len() < size {
            return None;
        }
        out.extend_from_slice(&rest[..size]);
        rest = &rest[size..];
        rest = rest.strip_prefix(b"\r\n").unwrap_or(rest);
    }
}
