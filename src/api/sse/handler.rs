//! SSE and MCP HTTP handlers

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::Stream;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::session::StreamGuard;
use crate::api::state::GatewayState;
use crate::auth::authenticate_headers;
use crate::protocol::{JsonRpcResponse, PROTOCOL_VERSION};

/// POST - Handle JSON-RPC requests
pub async fn mcp_request_handler(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let agent = match authenticate_headers(state.authenticator.as_ref(), &headers).await {
        Ok(agent) => agent,
        Err(e) => {
            tracing::warn!(error = %e, "rejected JSON-RPC request");
            return (StatusCode::UNAUTHORIZED, Json(JsonRpcResponse::rejected(e.to_string())))
                .into_response();
        }
    };

    let reply = state.server.handle(&body, &agent).await;
    (reply.status, Json(reply.response)).into_response()
}

/// GET - Event stream advertising the JSON-RPC endpoint, then keep-alive pings
pub async fn sse_handler(State(state): State<Arc<GatewayState>>, headers: HeaderMap) -> Response {
    let agent = match authenticate_headers(state.authenticator.as_ref(), &headers).await {
        Ok(agent) => agent,
        Err(e) => {
            tracing::warn!(error = %e, "rejected event stream");
            return (StatusCode::UNAUTHORIZED, e.to_string()).into_response();
        }
    };

    let guard = state.streams.open(agent.agent_id);
    let stream = endpoint_stream(
        state.endpoint_path.clone(),
        state.keepalive,
        state.shutdown_signal(),
        guard,
    );

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(stream),
    )
        .into_response()
}

/// One `endpoint` event, then a `:ping` comment every `period` until the
/// stream is dropped or the gateway shuts down. The interval and the guard
/// live inside the stream and are released with it.
pub fn endpoint_stream(
    endpoint: String,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    guard: StreamGuard,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let _guard = guard;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        yield Ok(Event::default().event("endpoint").data(endpoint));

        loop {
            if *shutdown.borrow() {
                break;
            }
            let ping = tokio::select! {
                _ = ticker.tick() => true,
                _ = shutdown.changed() => false,
            };
            if !ping {
                break;
            }
            yield Ok(Event::default().comment("ping"));
        }
    }
}

/// Response body for the info endpoint
#[derive(Debug, Serialize)]
pub struct ServerInfoResponse {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
    pub tool_count: usize,
    pub active_streams: usize,
}

/// GET - Server info and capabilities
pub async fn server_info_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    let server_info = state.server.server_info();
    Json(ServerInfoResponse {
        name: server_info.name.clone(),
        version: server_info.version.clone(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        tool_count: state.server.catalog().len(),
        active_streams: state.streams.active(),
    })
}
