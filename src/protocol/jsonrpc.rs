//! JSON-RPC 2.0 protocol types

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Invalid JSON was received by the server
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid Request object
pub const INVALID_REQUEST: i32 = -32600;
/// The method (or tool) does not exist
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameter(s)
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error
pub const INTERNAL_ERROR: i32 = -32603;
/// Transport-level rejection (authentication, rate limiting)
pub const UNAUTHORIZED: i32 = -32000;

/// Caller-supplied correlation token, echoed verbatim
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RequestId {
    Number(serde_json::Number),
    String(String),
}

impl RequestId {
    /// Placeholder id used when none could be recovered from the body
    pub fn zero() -> Self {
        RequestId::Number(serde_json::Number::from(0u64))
    }

    /// Recover an id from a raw JSON value. `null` and non-scalar values yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(RequestId::Number(n.clone())),
            Value::String(s) => Some(RequestId::String(s.clone())),
            _ => None,
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

/// JSON-RPC 2.0 Request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Validate a raw JSON value as a JSON-RPC 2.0 request envelope.
    ///
    /// On failure returns the best id that could be recovered, so the error
    /// envelope can still be correlated.
    pub fn from_value(value: Value) -> Result<Self, (RequestId, String)> {
        let Value::Object(mut obj) = value else {
            return Err((RequestId::zero(), "request must be a JSON object".to_string()));
        };

        let id = obj.get("id").and_then(RequestId::from_value);
        let fallback = id.clone().unwrap_or_else(RequestId::zero);

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            return Err((fallback, "jsonrpc must be '2.0'".to_string()));
        }

        let method = match obj.remove("method") {
            Some(Value::String(m)) if !m.is_empty() => m,
            _ => return Err((fallback, "method must be a non-empty string".to_string())),
        };

        let Some(id) = id else {
            return Err((fallback, "id must be a string or number".to_string()));
        };

        let params = obj.remove("params").filter(|p| !p.is_null());

        Ok(Self {
            jsonrpc: "2.0".to_string(),
            id,
            method,
            params,
        })
    }
}

/// JSON-RPC 2.0 Response carrying exactly one of `result` or `error`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

/// Outcome half of a response envelope
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    Result(Value),
    Error(ErrorObject),
}

impl JsonRpcResponse {
    /// Create a new success response
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            payload: ResponsePayload::Result(result),
        }
    }

    /// Create a new error response
    pub fn error(id: RequestId, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            payload: ResponsePayload::Error(ErrorObject::new(code, message.into(), data)),
        }
    }

    /// Create a parse error response
    pub fn parse_error(details: String) -> Self {
        Self::error(
            RequestId::zero(),
            PARSE_ERROR,
            "Parse error",
            Some(json!({"details": details})),
        )
    }

    /// Create an invalid request error response
    pub fn invalid_request(id: RequestId, details: String) -> Self {
        Self::error(
            id,
            INVALID_REQUEST,
            "Invalid Request",
            Some(json!({"details": details})),
        )
    }

    /// Create a method not found error response
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method), None)
    }

    /// Create an unknown tool error response (reuses the method-not-found code)
    pub fn unknown_tool(id: RequestId, tool: &str) -> Self {
        Self::error(
            id,
            METHOD_NOT_FOUND,
            format!("Unknown tool: {}", tool),
            Some(json!({"tool": tool})),
        )
    }

    /// Create an invalid params error response
    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, message, None)
    }

    /// Create an internal error response
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::error(id, INTERNAL_ERROR, message, None)
    }

    /// Create a transport-level rejection (auth, rate limit); the id is always 0
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::error(RequestId::zero(), UNAUTHORIZED, message, None)
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(v) => Some(v),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&ErrorObject> {
        match &self.payload {
            ResponsePayload::Error(e) => Some(e),
            ResponsePayload::Result(_) => None,
        }
    }
}

/// JSON-RPC 2.0 Error Object
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Create a new error object
    pub fn new(code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            code,
            message,
            data,
        }
    }
}
