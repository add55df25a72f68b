//! Route table: one marketplace REST call per tool

use serde_json::{json, Map, Value};

use super::{BackendRequest, DispatchError};
use crate::tools::ToolName;

/// Resolve a tool invocation into a backend request
pub fn route(tool: ToolName, args: &Map<String, Value>) -> Result<BackendRequest, DispatchError> {
    let request = match tool {
        ToolName::SearchHumans => BackendRequest::get("/api/humans").with_query(query(
            args,
            &["location", "skills", "min_rating", "max_rate", "available_now", "limit"],
        )),
        ToolName::GetHumanProfile => {
            BackendRequest::get(format!("/api/humans/{}", path_arg(args, "human_id")?))
        }
        ToolName::CreateTask => BackendRequest::post("/api/tasks", Value::Object(args.clone())),
        ToolName::CreateBooking => {
            BackendRequest::post("/api/bookings", Value::Object(args.clone()))
        }
        ToolName::GetBookingStatus => {
            BackendRequest::get(format!("/api/bookings/{}", path_arg(args, "booking_id")?))
        }
        ToolName::ListBookings => BackendRequest::get("/api/bookings")
            .with_query(query(args, &["status", "limit", "offset"])),
        ToolName::SubmitReview => BackendRequest::patch(
            format!("/api/bookings/{}", path_arg(args, "booking_id")?),
            action_body("review", args, &["rating", "comment"]),
        ),
        ToolName::CancelBooking => BackendRequest::patch(
            format!("/api/bookings/{}", path_arg(args, "booking_id")?),
            action_body("cancel", args, &["reason"]),
        ),
        ToolName::GetPlatformStats => {
            BackendRequest::get("/api/stats").with_query(query(args, &["region"]))
        }
    };
    Ok(request)
}

/// Percent-encoded path segment taken from a string or number argument
fn path_arg(args: &Map<String, Value>, key: &'static str) -> Result<String, DispatchError> {
    let raw = match args.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(DispatchError::MissingArgument(key)),
    };
    Ok(urlencoding::encode(&raw).into_owned())
}

/// Query pairs for the listed keys whose values are truthy
fn query(args: &Map<String, Value>, keys: &[&str]) -> Vec<(String, String)> {
    keys.iter()
        .filter_map(|key| {
            args.get(*key)
                .and_then(query_value)
                .map(|value| (key.to_string(), value))
        })
        .collect()
}

/// Render an argument as a query value. Falsy values (null, false, 0, "") are skipped.
fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(number_text(n)),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => number_text(n),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Integral floats render without a fractional part (`5.0` -> `5`)
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// PATCH body with an `action` discriminator plus the listed fields that are present
fn action_body(action: &str, args: &Map<String, Value>, keys: &[&str]) -> Value {
    let mut body = Map::new();
    body.insert("action".to_string(), json!(action));
    for key in keys {
        if let Some(value) = args.get(*key).filter(|v| !v.is_null()) {
            body.insert(key.to_string(), value.clone());
        }
    }
    Value::Object(body)
}
