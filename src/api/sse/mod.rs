//! SSE (Server-Sent Events) transport for MCP over HTTP
//!
//! ## Endpoints
//! - `GET /api/mcp` - event stream: one `endpoint` event, then keep-alive pings
//! - `POST /api/mcp` - JSON-RPC requests from client to server
//! - `GET /api/mcp/info` - Server info and capabilities
//!
//! The event stream never carries JSON-RPC payloads; it tells streaming
//! clients where to POST and keeps intermediaries from timing out.

pub mod handler;
pub mod session;

pub use handler::{endpoint_stream, mcp_request_handler, server_info_handler, sse_handler};
pub use session::{StreamGuard, StreamTracker};
