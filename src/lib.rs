//! OpenHuman MCP Gateway
//!
//! A Model Context Protocol server that lets AI agents search for, book and
//! review human workers on the OpenHuman marketplace. Tool calls are
//! forwarded to the marketplace REST API on behalf of the calling agent.
//!
//! # Features
//!
//! - **9 MCP Tools**: human search, tasks, bookings, reviews, platform stats
//! - **Two transports**: synchronous JSON-RPC over POST, event stream over GET
//! - **Agent auth**: `oh_` API keys and HS256 agent tokens
//! - **Stateless**: no per-agent state between calls
//!
//! # Modules
//!
//! - `protocol`: MCP and JSON-RPC protocol types
//! - `tools`: the tool catalog
//! - `backend`: routes tool calls to the marketplace REST API
//! - `auth`: bearer credential verification
//! - `server`: JSON-RPC method routing
//! - `api`: axum router, handlers and event streams
//! - `rate_limit`: per-client request budget
//! - `config`, `logging`: process setup
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use clap::Parser;
//! use openhuman_mcp::{api, GatewayConfig, InMemoryRateLimitStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::parse();
//!     let store = Arc::new(InMemoryRateLimitStore::new(Duration::from_secs(60)));
//!     let state = Arc::new(api::GatewayState::from_config(&config, store)?);
//!     let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
//!     axum::serve(listener, api::create_router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod backend;
pub mod config;
pub mod logging;
pub mod protocol;
pub mod rate_limit;
pub mod server;
pub mod tools;

// Re-export commonly used items at crate root
pub use auth::{AgentAuthenticator, AgentIdentity};
pub use backend::{Backend, BackendRequest, DispatchError, Dispatcher, HttpBackend};
pub use config::{ConfigError, GatewayConfig};
pub use protocol::{JsonRpcRequest, JsonRpcResponse, McpTool, RequestId, ServerInfo};
pub use rate_limit::{InMemoryRateLimitStore, RateLimitStore, RateLimiter, WindowCount};
pub use server::McpServer;
pub use tools::{ToolCatalog, ToolName};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
