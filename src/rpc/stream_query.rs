//! Positional parameters for the three stream-listing RPC methods.
//!
//! MultiChain's calls differ in shape:
//! ```text
//! liststreamitems          [stream, verbose, count, start(, local-ordering)]
//! liststreamkeyitems       [stream, key, verbose, count, start, local-ordering]
//! liststreampublisheritems [stream, address, verbose, count, start, local-ordering]
//! ```
//! A negative `start` counts back from the newest item, so the default
//! `start = -count` selects the most recent `count` items.

use serde_json::{json, Value};

use crate::rpc::types::InvalidArgument;

/// Default number of items requested.
pub const DEFAULT_COUNT: i64 = 1000;

/// Options for one stream query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamQueryOptions {
    stream: String,
    verbose: bool,
    count: i64,
    start: Option<i64>,
    local_ordering: Option<bool>,
    key: Option<String>,
    address: Option<String>,
}

impl StreamQueryOptions {
    /// Recency scan over `stream`.
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            verbose: false,
            count: DEFAULT_COUNT,
            start: None,
            local_ordering: None,
            key: None,
            address: None,
        }
    }

    /// Items published under `key`.
    pub fn for_key(stream: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(stream)
        }
    }

    /// Items published by `address`.
    pub fn for_publisher(stream: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::new(stream)
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }

    pub fn start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn local_ordering(mut self, local_ordering: bool) -> Self {
        self.local_ordering = Some(local_ordering);
        self
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn count_value(&self) -> i64 {
        self.count
    }

    /// Explicit start, or `-count`.
    pub fn effective_start(&self) -> i64 {
        self.start.unwrap_or(self.count.saturating_neg())
    }

    /// `liststreamitems`; the ordering flag is only sent when set.
    pub fn to_stream_items_params(&self) -> Vec<Value> {
        let mut params = vec![
            json!(self.stream),
            json!(self.verbose),
            json!(self.count),
            json!(self.effective_start()),
        ];
        if let Some(local_ordering) = self.local_ordering {
            params.push(json!(local_ordering));
        }
        params
    }

    /// `liststreamkeyitems`; requires a key.
    pub fn to_stream_key_items_params(&self) -> Result<Vec<Value>, InvalidArgument> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| InvalidArgument("Key is required for key-filtered stream queries".to_string()))?;
        Ok(self.filtered_params(key))
    }

    /// `liststreampublisheritems`; requires a publisher address.
    pub fn to_stream_publisher_items_params(&self) -> Result<Vec<Value>, InvalidArgument> {
        let address = self.address.as_deref().ok_or_else(|| {
            InvalidArgument("Address is required for publisher-filtered stream queries".to_string())
        })?;
        Ok(self.filtered_params(address))
    }

    fn filtered_params(&self, filter: &str) -> Vec<Value> {
        vec![
            json!(self.stream),
            json!(filter),
            json!(self.verbose),
            json!(self.count),
            json!(self.effective_start()),
            json!(self.local_ordering.unwrap_or(false)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_start_is_negative_count() {
        let options = StreamQueryOptions::new("procurement.documents");
        assert_eq!(options.effective_start(), -1000);
        assert_eq!(
            options.to_stream_items_params(),
            vec![json!("procurement.documents"), json!(false), json!(1000), json!(-1000)]
        );
    }

    #[test]
    fn test_explicit_start_and_ordering() {
        let options = StreamQueryOptions::new("docs")
            .verbose(true)
            .count(10)
            .start(0)
            .local_ordering(true);
        assert_eq!(
            options.to_stream_items_params(),
            vec![json!("docs"), json!(true), json!(10), json!(0), json!(true)]
        );
    }

    #[test]
    fn test_key_params_always_carry_ordering() {
        let options = StreamQueryOptions::for_key("docs", "PR-0042").count(5);
        assert_eq!(
            options.to_stream_key_items_params().unwrap(),
            vec![json!("docs"), json!("PR-0042"), json!(false), json!(5), json!(-5), json!(false)]
        );
    }

    #[test]
    fn test_publisher_params() {
        let options = StreamQueryOptions::for_publisher("docs", "1Addr").verbose(true);
        assert_eq!(
            options.to_stream_publisher_items_params().unwrap(),
            vec![
                json!("docs"),
                json!("1Addr"),
                json!(true),
                json!(1000),
                json!(-1000),
                json!(false)
            ]
        );
    }

    #[test]
    fn test_extreme_count_does_not_overflow() {
        let options = StreamQueryOptions::new("docs").count(i64::MIN);
        assert_eq!(options.effective_start(), i64::MAX);
    }

    #[test]
    fn test_wrong_mode_is_invalid_argument() {
        let key_mode = StreamQueryOptions::for_key("docs", "k");
        let err = key_mode.to_stream_publisher_items_params().unwrap_err();
        assert!(err.to_string().contains("Address"));

        let publisher_mode = StreamQueryOptions::for_publisher("docs", "a");
        assert!(publisher_mode.to_stream_key_items_params().is_err());
        assert!(StreamQueryOptions::new("docs").to_stream_key_items_params().is_err());
    }
}
