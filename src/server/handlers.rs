//! Helpers for the `tools/call` method

use serde_json::{json, Map, Value};

/// Extract tool arguments from params; anything but an object counts as empty
pub fn extract_arguments(params: &Value) -> Map<String, Value> {
    params
        .get("arguments")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Extract a non-empty tool name from params
pub fn extract_tool_name(params: &Value) -> Option<&str> {
    params
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|name| !name.is_empty())
}

/// Build a text content response
pub fn text_response(text: String) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": text
        }]
    })
}
