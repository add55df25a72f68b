//! Integration tests for the OpenHuman MCP gateway
//!
//! The gateway router is driven in-process while tool calls are forwarded over
//! real HTTP to a mock marketplace backend bound to an ephemeral port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use openhuman_mcp::api::{create_router, GatewayState};
use openhuman_mcp::auth::ApiKeyAuthenticator;
use openhuman_mcp::backend::{Dispatcher, HttpBackend};
use openhuman_mcp::protocol::ServerInfo;
use openhuman_mcp::server::McpServer;
use openhuman_mcp::tools::{ToolCatalog, ToolName};

const API_KEY: &str = "oh_integration_key";

fn caller(headers: &HeaderMap) -> Value {
    json!({
        "agent": headers.get("x-agent-id").and_then(|v| v.to_str().ok()),
        "mcp": headers.get("x-mcp-request").and_then(|v| v.to_str().ok()),
    })
}

/// Minimal stand-in for the marketplace REST API
fn mock_marketplace() -> Router {
    Router::new()
        .route(
            "/api/humans",
            get(|headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "success": true,
                    "data": [{"id": "h_1", "name": "Aiko", "location": "Tokyo"}],
                    "query": q,
                    "caller": caller(&headers),
                }))
            }),
        )
        .route(
            "/api/humans/:id",
            get(|Path(id): Path<String>| async move {
                Json(json!({"success": true, "data": {"id": id}}))
            }),
        )
        .route(
            "/api/tasks",
            axum::routing::post(|Json(body): Json<Value>| async move {
                (StatusCode::CREATED, Json(json!({"success": true, "data": body})))
            }),
        )
        .route(
            "/api/bookings",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                Json(json!({"success": true, "data": [], "query": q}))
            })
            .post(|Json(body): Json<Value>| async move {
                Json(json!({"success": true, "data": body}))
            }),
        )
        .route(
            "/api/bookings/:id",
            get(|Path(id): Path<String>| async move {
                if id == "missing" {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({"success": false, "error": "Booking not found"})),
                    )
                } else {
                    (
                        StatusCode::OK,
                        Json(json!({"success": true, "data": {"id": id, "status": "pending"}})),
                    )
                }
            })
            .patch(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                Json(json!({"success": true, "id": id, "received": body}))
            }),
        )
        .route(
            "/api/stats",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("region").map(String::as_str) == Some("boom") {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "db down"})))
                } else {
                    (StatusCode::OK, Json(json!({"success": true, "region": q.get("region")})))
                }
            }),
        )
}

async fn spawn_marketplace() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock_marketplace()).await.unwrap();
    });
    addr
}

async fn gateway_state(keepalive: Duration) -> Arc<GatewayState> {
    let addr = spawn_marketplace().await;
    let backend =
        HttpBackend::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    let server = McpServer::new(
        ServerInfo::default(),
        Arc::new(ToolCatalog::new()),
        Dispatcher::new(Arc::new(backend)),
    );
    Arc::new(
        GatewayState::new(server, Arc::new(ApiKeyAuthenticator::new())).with_keepalive(keepalive),
    )
}

async fn gateway() -> Router {
    create_router(gateway_state(Duration::from_secs(30)).await)
}

async fn post_rpc(app: &Router, body: &str, auth: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/mcp")
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn bearer() -> String {
    format!("Bearer {}", API_KEY)
}

async fn call_tool(app: &Router, id: i64, name: &str, arguments: Value) -> (StatusCode, Value) {
    let body = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    });
    post_rpc(app, &body.to_string(), Some(&bearer())).await
}

fn tool_text(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_tools_list_returns_full_catalog() {
    let app = gateway().await;
    let (status, body) = post_rpc(
        &app,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
        Some(&bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    let tools = body["result"]["tools"].as_array().unwrap();
    assert!(!tools.is_empty());
    for tool in tools {
        assert!(tool.get("name").is_some());
        assert!(tool.get("description").is_some());
        assert!(tool.get("inputSchema").is_some());
    }

    // Advertised set == routable set
    let advertised: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    let routable: Vec<&str> = ToolName::ALL.iter().map(|t| t.as_str()).collect();
    assert_eq!(advertised, routable);
}

#[tokio::test]
async fn test_initialize() {
    let app = gateway().await;
    let (status, body) = post_rpc(
        &app,
        r#"{"jsonrpc":"2.0","id":"init","method":"initialize","params":{}}"#,
        Some(&bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "init");
    assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(body["result"]["capabilities"]["tools"]["listChanged"], false);
}

#[tokio::test]
async fn test_search_humans_preserves_backend_shape() {
    let app = gateway().await;
    let (status, body) = call_tool(
        &app,
        2,
        "search_humans",
        json!({"location": "Tokyo", "limit": 5, "skills": ["photography", "mandarin"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    let payload = tool_text(&body);
    assert_eq!(payload["success"], true);
    assert_eq!(payload["query"]["location"], "Tokyo");
    assert_eq!(payload["query"]["limit"], "5");
    assert_eq!(payload["query"]["skills"], "photography,mandarin");
    assert_eq!(payload["caller"]["agent"], "agent-integrat");
    assert_eq!(payload["caller"]["mcp"], "true");
}

#[tokio::test]
async fn test_missing_authorization_is_401() {
    let app = gateway().await;
    let body = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"search_humans","arguments":{"location":"Tokyo","limit":5}}}"#;

    let (status, response) = post_rpc(&app, body, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["id"], 0);
    assert_eq!(response["error"]["code"], -32000);

    let (status, _) = post_rpc(&app, body, Some("Basic dXNlcjpwYXNz")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, response) = post_rpc(&app, body, Some("Bearer sk_wrong_vendor")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["error"]["message"], "Invalid API key");
}

#[tokio::test]
async fn test_auth_is_checked_before_parsing() {
    let app = gateway().await;
    let (status, _) = post_rpc(&app, "{not json", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let app = gateway().await;
    let (status, body) = post_rpc(
        &app,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"not_a_real_tool"}}"#,
        Some(&bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);
    assert_eq!(body["error"]["code"], -32601);
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_protocol_framing_errors() {
    let app = gateway().await;

    let (status, body) = post_rpc(&app, "{\"jsonrpc\":", Some(&bearer())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], 0);

    let (status, body) = post_rpc(
        &app,
        r#"{"jsonrpc":"1.0","id":"v1","method":"tools/list"}"#,
        Some(&bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32600);
    assert_eq!(body["id"], "v1");

    let (status, body) =
        post_rpc(&app, r#"{"jsonrpc":"2.0","id":4}"#, Some(&bearer())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32600);

    let (status, body) = post_rpc(
        &app,
        r#"{"jsonrpc":"2.0","id":5,"method":"prompts/list"}"#,
        Some(&bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32601);

    let (status, body) = post_rpc(
        &app,
        r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{}}"#,
        Some(&bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32602);
}

#[tokio::test]
async fn test_backend_client_errors_are_relayed() {
    let app = gateway().await;
    let (status, body) = call_tool(&app, 7, "get_booking_status", json!({"booking_id": "missing"})).await;

    assert_eq!(status, StatusCode::OK);
    let payload = tool_text(&body);
    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "Booking not found");
}

#[tokio::test]
async fn test_backend_server_error_is_internal_error() {
    let app = gateway().await;
    let (status, body) = call_tool(&app, 8, "get_platform_stats", json!({"region": "boom"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 8);
    assert_eq!(body["error"]["code"], -32603);
    assert_eq!(body["error"]["message"], "Backend error: HTTP 500");
}

#[tokio::test]
async fn test_unreachable_backend_is_internal_error() {
    let server = McpServer::new(
        ServerInfo::default(),
        Arc::new(ToolCatalog::new()),
        Dispatcher::new(Arc::new(
            HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap(),
        )),
    );
    let app = create_router(Arc::new(GatewayState::new(
        server,
        Arc::new(ApiKeyAuthenticator::new()),
    )));

    let (status, body) = call_tool(&app, 9, "list_bookings", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32603);
    assert!(!body["error"]["message"].as_str().unwrap().contains("127.0.0.1"));
}

#[tokio::test]
async fn test_booking_lifecycle_routes() {
    let app = gateway().await;

    let (_, body) = call_tool(
        &app,
        10,
        "create_booking",
        json!({"task_id": "t_1", "human_id": "h_1", "payment_method": "usdc_base"}),
    )
    .await;
    assert_eq!(tool_text(&body)["data"]["payment_method"], "usdc_base");

    let (_, body) = call_tool(
        &app,
        11,
        "submit_review",
        json!({"booking_id": "b_1", "rating": 5, "comment": "On time"}),
    )
    .await;
    let payload = tool_text(&body);
    assert_eq!(payload["id"], "b_1");
    assert_eq!(payload["received"], json!({"action": "review", "rating": 5, "comment": "On time"}));

    let (_, body) = call_tool(&app, 12, "cancel_booking", json!({"booking_id": "b_1"})).await;
    assert_eq!(tool_text(&body)["received"], json!({"action": "cancel"}));

    let (_, body) = call_tool(&app, 13, "list_bookings", json!({"status": "pending", "offset": 0})).await;
    assert_eq!(tool_text(&body)["query"], json!({"status": "pending"}));

    let (_, body) = call_tool(
        &app,
        14,
        "create_task",
        json!({
            "title": "Verify storefront",
            "description": "Photograph the shop entrance",
            "category": "verification",
            "location": "Lisbon",
            "pay_amount": 25
        }),
    )
    .await;
    assert_eq!(tool_text(&body)["data"]["category"], "verification");
}

#[tokio::test]
async fn test_identical_read_calls_produce_identical_envelopes() {
    let app = gateway().await;
    let args = json!({"location": "Tokyo", "limit": 5});
    let (_, first) = call_tool(&app, 2, "search_humans", args.clone()).await;
    let (_, second) = call_tool(&app, 2, "search_humans", args).await;
    assert_eq!(first, second);
}

/// Comment payloads (`: text` or `:text` lines) in raw event-stream text
fn comment_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .filter_map(|line| line.strip_prefix(':'))
        .map(str::trim)
        .collect()
}

async fn open_stream(app: Router) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .uri("/api/mcp")
            .header("authorization", bearer())
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_event_stream_lifecycle() {
    let state = gateway_state(Duration::from_millis(100)).await;
    let response = open_stream(create_router(state.clone())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
    assert_eq!(response.headers()["cache-control"], "no-cache");
    assert_eq!(state.streams.active(), 1);

    let mut body = response.into_body().into_data_stream();
    let mut received = String::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !comment_lines(&received).contains(&"ping") {
            let chunk = body.next().await.unwrap().unwrap();
            received.push_str(&String::from_utf8_lossy(&chunk));
        }
    })
    .await
    .expect("keep-alive within timeout");

    assert!(received.starts_with("event: endpoint\ndata: /api/mcp\n\n"));
    assert_eq!(state.streams.active(), 1);

    // Client disconnect drops the body and with it the stream's timer
    drop(body);
    assert_eq!(state.streams.active(), 0);
}

#[tokio::test]
async fn test_event_stream_released_before_first_keepalive() {
    let state = gateway_state(Duration::from_secs(3600)).await;
    let response = open_stream(create_router(state.clone())).await;
    let mut body = response.into_body().into_data_stream();

    let first = tokio::time::timeout(Duration::from_secs(5), body.next())
        .await
        .expect("endpoint event")
        .unwrap()
        .unwrap();
    let first = String::from_utf8_lossy(&first).into_owned();
    assert!(first.contains("event: endpoint"));
    assert!(comment_lines(&first).is_empty());
    assert_eq!(state.streams.active(), 1);

    drop(body);
    assert_eq!(state.streams.active(), 0);
}

#[tokio::test]
async fn test_event_stream_ends_on_shutdown() {
    let state = gateway_state(Duration::from_secs(3600)).await;
    let response = open_stream(create_router(state.clone())).await;
    let mut body = response.into_body().into_data_stream();

    tokio::time::timeout(Duration::from_secs(5), body.next())
        .await
        .expect("endpoint event")
        .unwrap()
        .unwrap();

    state.shutdown();
    let next = tokio::time::timeout(Duration::from_secs(5), body.next())
        .await
        .expect("stream ends after shutdown");
    assert!(next.is_none());
    assert_eq!(state.streams.active(), 0);
}

#[tokio::test]
async fn test_event_stream_requires_auth() {
    let state = gateway_state(Duration::from_millis(100)).await;
    let app = create_router(state.clone());

    let response = app
        .oneshot(Request::builder().uri("/api/mcp").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(state.streams.active(), 0);
}

#[tokio::test]
async fn test_info_reports_open_streams() {
    let state = gateway_state(Duration::from_secs(30)).await;
    let app = create_router(state.clone());
    let _guard = state.streams.open("agent-info".to_string());

    let response = app
        .oneshot(Request::builder().uri("/api/mcp/info").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let info: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(info["name"], "openhuman");
    assert_eq!(info["tool_count"], 9);
    assert_eq!(info["active_streams"], 1);
}
