//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::rate_limit;
use super::sse::{mcp_request_handler, server_info_handler, sse_handler};
use super::state::GatewayState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<GatewayState>) -> Router {
    // Agents call from anywhere; credentials travel in headers, not cookies
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let endpoint = state.endpoint_path.clone();
    let info = format!("{}/info", endpoint.trim_end_matches('/'));

    let mcp = Router::new()
        .route(&endpoint, get(sse_handler).post(mcp_request_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .merge(mcp)
        .route(&info, get(server_info_handler))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "openhuman-mcp",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
}
