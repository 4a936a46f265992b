//! JSON-RPC request construction and response envelope parsing.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use crate::rpc::types::{RpcError, RpcResult, MALFORMED_ENVELOPE};
use crate::transport::TransportResponse;

/// `{id, method, params[, chain_name]}` as sent to the node.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// Call timestamp in unix seconds.
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
    pub chain_name: Option<String>,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>, chain_name: Option<String>) -> Self {
        let id = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        Self {
            id,
            method: method.into(),
            params,
            chain_name,
        }
    }

    pub fn to_json(&self) -> String {
        let mut payload = json!({
            "id": self.id,
            "method": self.method,
            "params": self.params,
        });
        if let Some(chain_name) = &self.chain_name {
            payload["chain_name"] = json!(chain_name);
        }
        payload.to_string()
    }
}

/// Interpret a transport reply as a JSON-RPC result.
pub fn parse_response(response: &TransportResponse) -> RpcResult<Value> {
    if !response.is_success() {
        // Nodes report failing calls as HTTP 500 with an error envelope.
        // A JSON body with the wrong shape is malformed at any status.
        let envelope_failure = match decode(&response.body) {
            Ok(envelope) => envelope_error(&envelope),
            Err(e) if e == RpcError::invalid_structure() => Some(e),
            Err(_) => None,
        };
        return Err(envelope_failure.unwrap_or_else(|| RpcError::Http {
            status: response.status,
            message: response.reason.clone(),
        }));
    }

    parse_envelope(&response.body)
}

/// Decode a 2xx body: validate structure, surface node errors, return `result`.
pub fn parse_envelope(body: &str) -> RpcResult<Value> {
    let mut envelope = decode(body)?;
    if let Some(err) = envelope_error(&envelope) {
        return Err(err);
    }

    Ok(envelope
        .as_object_mut()
        .and_then(|object| object.remove("result"))
        .unwrap_or(Value::Null))
}

fn envelope_error(envelope: &Value) -> Option<RpcError> {
    let error = &envelope["error"];
    if error.is_null() {
        return None;
    }

    // A zero code would read as success.
    let code = error["code"]
        .as_i64()
        .filter(|code| *code != 0)
        .unwrap_or(MALFORMED_ENVELOPE);
    let message = match &error["message"] {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Some(RpcError::from_node(code, message))
}

fn decode(body: &str) -> RpcResult<Value> {
    let envelope: Value = serde_json::from_str(body).map_err(|_| RpcError::invalid_json())?;
    if envelope.is_null() {
        return Err(RpcError::invalid_json());
    }

    let structured = envelope
        .as_object()
        .map(|object| object.contains_key("error") && object.contains_key("result"))
        .unwrap_or(false);
    if !structured {
        return Err(RpcError::invalid_structure());
    }
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = RpcRequest::new("liststreamitems", vec![json!("docs"), json!(true)], None);
        let encoded: Value = serde_json::from_str(&request.to_json()).unwrap();

        assert!(encoded["id"].is_u64());
        assert_eq!(encoded["method"], "liststreamitems");
        assert_eq!(encoded["params"], json!(["docs", true]));
        assert!(encoded.get("chain_name").is_none());
    }

    #[test]
    fn test_request_with_chain_name() {
        let request = RpcRequest::new("getinfo", vec![], Some("procurement".into()));
        let encoded: Value = serde_json::from_str(&request.to_json()).unwrap();
        assert_eq!(encoded["chain_name"], "procurement");
        assert_eq!(encoded["params"], json!([]));
    }

    #[test]
    fn test_result_returned() {
        assert_eq!(parse_envelope(r#"{"error":null,"result":"abc"}"#).unwrap(), json!("abc"));
        assert_eq!(parse_envelope(r#"{"error":null,"result":null}"#).unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(parse_envelope("not json").unwrap_err(), RpcError::invalid_json());
        assert_eq!(parse_envelope("").unwrap_err(), RpcError::invalid_json());
        assert_eq!(parse_envelope("null").unwrap_err(), RpcError::invalid_json());
    }

    #[test]
    fn test_invalid_structure() {
        assert_eq!(
            parse_envelope(r#"{"error":null}"#).unwrap_err(),
            RpcError::invalid_structure()
        );
        assert_eq!(
            parse_envelope(r#"{"result":1}"#).unwrap_err(),
            RpcError::invalid_structure()
        );
        assert_eq!(parse_envelope("[1,2]").unwrap_err(), RpcError::invalid_structure());
    }

    #[test]
    fn test_node_error_with_usage() {
        let err = parse_envelope(r#"{"error":{"code":-1,"message":"foo\n\nbar"},"result":null}"#)
            .unwrap_err();
        assert_eq!(err.code(), -1);
        assert!(err.message().starts_with("Wrong parameters. Usage:\n\n"));
    }

    #[test]
    fn test_non_success_status() {
        let forbidden = TransportResponse::new(403, "Forbidden", "");
        assert_eq!(
            parse_response(&forbidden).unwrap_err(),
            RpcError::Http {
                status: 403,
                message: "Forbidden".into()
            }
        );

        let server_error = TransportResponse::new(
            500,
            "Internal Server Error",
            r#"{"error":{"code":-708,"message":"Stream not found"},"result":null,"id":1}"#,
        );
        assert_eq!(
            parse_response(&server_error).unwrap_err(),
            RpcError::Rpc {
                code: -708,
                message: "Stream not found".into()
            }
        );

        let html = TransportResponse::new(502, "Bad Gateway", "<html>upstream down</html>");
        assert_eq!(parse_response(&html).unwrap_err().code(), 502);
    }

    #[test]
    fn test_missing_result_is_malformed_at_any_status() {
        for status in [200, 403, 500] {
            let response = TransportResponse::new(status, "", r#"{"error":null}"#);
            let err = parse_response(&response).unwrap_err();
            assert_eq!(err, RpcError::invalid_structure(), "status {}", status);
            assert_eq!(err.code(), MALFORMED_ENVELOPE);
        }
    }
}
