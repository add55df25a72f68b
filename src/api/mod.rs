//! HTTP API for AI agents
//!
//! Serves the synchronous JSON-RPC transport, the event-stream transport and
//! a health check.

pub mod http;
pub mod middleware;
pub mod sse;
pub mod state;

pub use http::create_router;
pub use state::GatewayState;
