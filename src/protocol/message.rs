//! JSON-RPC 2.0 message codec
//!
//! Parses raw request text into a typed [`JsonRpcMessage`] and builds the
//! outbound wire strings. Every payload sub-value (`params`, `id`, `result`,
//! `error`) is cloned out of the source tree, so a parsed message owns its
//! data independently of the buffer it came from.

use {
    crate::error::{McpError, McpResult},
    serde_json::{json, Value},
};

/// The only protocol version this codec accepts or emits.
pub const JSONRPC_VERSION: &str = "2.0";

/// A parsed JSON-RPC 2.0 message. Exactly one shape holds per message.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRpcMessage {
    /// A method call that expects a response. The id is never `Value::Null`.
    Request {
        method: String,
        params: Option<Value>,
        id: Value,
    },
    /// A method call that must never produce output.
    Notification {
        method: String,
        params: Option<Value>,
    },
    /// A response carrying a result.
    Response { result: Value, id: Option<Value> },
    /// A response carrying an error object.
    Error { error: Value, id: Option<Value> },
}

impl JsonRpcMessage {
    /// Parse a raw JSON-RPC payload.
    ///
    /// Fails hard (no partial message) on malformed JSON, a missing or
    /// non-"2.0" `jsonrpc` field, or a shape that is none of
    /// request/notification/response/error. Callers owing a reply convert
    /// the failure into a Parse Error (-32700) response.
    pub fn parse(raw: &str) -> McpResult<Self> {
        let root: Value = serde_json::from_str(raw)?;

        let version = root.get("jsonrpc").and_then(Value::as_str);
        if version != Some(JSONRPC_VERSION) {
            return Err(McpError::Parse(
                "missing or invalid jsonrpc version".to_string(),
            ));
        }

        // An explicit `"id": null` counts as no id: requests always carry a
        // non-null id, so a null-id method call classifies as a notification.
        let id = root.get("id").filter(|id| !id.is_null()).cloned();
        let params = root.get("params").cloned();

        if let Some(method) = root.get("method").and_then(Value::as_str) {
            let method = method.to_string();
            return Ok(match id {
                Some(id) => Self::Request { method, params, id },
                None => Self::Notification { method, params },
            });
        }

        if let Some(result) = root.get("result") {
            return Ok(Self::Response {
                result: result.clone(),
                id,
            });
        }

        if let Some(error) = root.get("error") {
            return Ok(Self::Error {
                error: error.clone(),
                id,
            });
        }

        Err(McpError::Parse(
            "message is neither request, notification, response nor error".to_string(),
        ))
    }

    /// Method name for requests and notifications
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Request { method, .. } | Self::Notification { method, .. } => Some(method),
            _ => None,
        }
    }

    /// Message id, when one is present
    pub fn id(&self) -> Option<&Value> {
        match self {
            Self::Request { id, .. } => Some(id),
            Self::Notification { .. } => None,
            Self::Response { id, .. } | Self::Error { id, .. } => id.as_ref(),
        }
    }
}

/// Build a success response string.
///
/// `result` is encoded as an explicit `null` when absent, as is `id`.
pub fn response(id: Option<&Value>, result: Option<&Value>) -> String {
    let body = json!({
        "jsonrpc": JSONRPC_VERSION,
        "result": result.cloned().unwrap_or(Value::Null),
        "id": id.cloned().unwrap_or(Value::Null),
    });
    body.to_string()
}

/// Build an error response string with `error: {code, message, data?}`.
pub fn error_response(id: Option<&Value>, code: i32, message: &str, data: Option<&Value>) -> String {
    let mut error = json!({
        "code": code,
        "message": message,
    });
    if let Some(data) = data {
        error["data"] = data.clone();
    }
    let body = json!({
        "jsonrpc": JSONRPC_VERSION,
        "error": error,
        "id": id.cloned().unwrap_or(Value::Null),
    });
    body.to_string()
}

/// Build a request string. The id is added only when present, so a request
/// built without one is a notification on the wire.
pub fn request(method: &str, params: Option<&Value>, id: Option<&Value>) -> String {
    let mut body = json!({
        "jsonrpc": JSONRPC_VERSION,
        "method": method,
    });
    if let Some(params) = params {
        body["params"] = params.clone();
    }
    if let Some(id) = id {
        body["id"] = id.clone();
    }
    body.to_string()
}

/// Build a notification string (a request without an id)
pub fn notification(method: &str, params: Option<&Value>) -> String {
    request(method, params, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"method":"ping","params":{"foo":"bar"}}"#;
        let msg = JsonRpcMessage::parse(raw).unwrap();

        match msg {
            JsonRpcMessage::Request { method, params, id } => {
                assert_eq!(method, "ping");
                assert_eq!(params.unwrap()["foo"], "bar");
                assert_eq!(id, json!(1));
            }
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_notification() {
        let raw = r#"{"jsonrpc":"2.0","method":"initialized"}"#;
        let msg = JsonRpcMessage::parse(raw).unwrap();

        assert!(matches!(msg, JsonRpcMessage::Notification { .. }));
        assert_eq!(msg.method(), Some("initialized"));
        assert!(msg.id().is_none());
    }

    #[test]
    fn test_null_id_classifies_as_notification() {
        let raw = r#"{"jsonrpc":"2.0","id":null,"method":"initialized"}"#;
        let msg = JsonRpcMessage::parse(raw).unwrap();
        assert!(matches!(msg, JsonRpcMessage::Notification { .. }));
    }

    #[test]
    fn test_parse_response_and_error() {
        let ok = JsonRpcMessage::parse(r#"{"jsonrpc":"2.0","result":{"a":1},"id":7}"#).unwrap();
        assert!(matches!(ok, JsonRpcMessage::Response { .. }));
        assert_eq!(ok.id(), Some(&json!(7)));

        let err =
            JsonRpcMessage::parse(r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"x"},"id":7}"#)
                .unwrap();
        assert!(matches!(err, JsonRpcMessage::Error { .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_version() {
        let result = JsonRpcMessage::parse(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#);
        assert!(matches!(result, Err(McpError::Parse(_))));

        let result = JsonRpcMessage::parse(r#"{"id":1,"method":"ping"}"#);
        assert!(matches!(result, Err(McpError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(JsonRpcMessage::parse("{not json").is_err());
    }

    #[test]
    fn test_parse_rejects_ambiguous_shape() {
        let result = JsonRpcMessage::parse(r#"{"jsonrpc":"2.0","id":1}"#);
        assert!(matches!(result, Err(McpError::Parse(_))));
    }

    #[test]
    fn test_non_string_method_falls_through() {
        // A numeric `method` is not a request; with a `result` present the
        // message still classifies as a response.
        let msg =
            JsonRpcMessage::parse(r#"{"jsonrpc":"2.0","method":42,"result":{},"id":1}"#).unwrap();
        assert!(matches!(msg, JsonRpcMessage::Response { .. }));
    }

    #[test]
    fn test_round_trip_ping_request() {
        let raw = request("ping", None, Some(&json!(1)));
        let msg = JsonRpcMessage::parse(&raw).unwrap();

        match msg {
            JsonRpcMessage::Request { method, id, params } => {
                assert_eq!(method, "ping");
                assert_eq!(id, json!(1));
                assert!(params.is_none());
            }
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn test_response_encodes_explicit_nulls() {
        let raw = response(None, None);
        let body: Value = serde_json::from_str(&raw).unwrap();
        assert!(body.get("result").unwrap().is_null());
        assert!(body.get("id").unwrap().is_null());
    }

    #[test]
    fn test_error_response_shape() {
        let raw = error_response(Some(&json!(3)), -32601, "Method not found", None);
        let body: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["error"]["message"], "Method not found");
        assert!(body["error"].get("data").is_none());
        assert_eq!(body["id"], 3);
    }

    #[test]
    fn test_error_response_with_data() {
        let raw = error_response(None, -32602, "Invalid params", Some(&json!({"path": "root"})));
        let body: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(body["error"]["data"]["path"], "root");
        assert!(body["id"].is_null());
    }

    #[test]
    fn test_notification_has_no_id() {
        let raw = notification("initialized", None);
        let body: Value = serde_json::from_str(&raw).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["method"], "initialized");
    }
}
