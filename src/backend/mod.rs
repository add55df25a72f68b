//! Backend dispatcher
//!
//! Forwards tool invocations to the marketplace REST API. Each tool maps to a
//! fixed route (see [`routes`]); the dispatcher performs no business logic and
//! relays whatever JSON the backend answers with.

mod http;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::auth::AgentIdentity;
use crate::tools::{ToolName, UnknownTool};

pub use http::HttpBackend;

/// HTTP methods used by the marketplace routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMethod {
    Get,
    Post,
    Patch,
}

/// A fully resolved backend call
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: BackendMethod,
    /// Path relative to the backend base URL, already percent-encoded
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl BackendRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: BackendMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: BackendMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: BackendMethod::Patch,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// Failures while forwarding a tool call. Messages are shown to agents.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    UnknownTool(#[from] UnknownTool),
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
    #[error("Backend request failed: {0}")]
    Transport(String),
    #[error("Backend request timed out")]
    Timeout,
    #[error("Backend error: HTTP {0}")]
    Upstream(u16),
    #[error("Backend returned invalid JSON: {0}")]
    InvalidResponse(String),
}

/// Marketplace REST backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Perform a request on behalf of an agent and return the decoded JSON body
    async fn send(
        &self,
        request: BackendRequest,
        agent: &AgentIdentity,
    ) -> Result<Value, DispatchError>;
}

/// Maps tool invocations onto backend calls
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Invoke a tool by wire name; unknown names raise `UnknownTool`
    pub async fn invoke(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
        agent: &AgentIdentity,
    ) -> Result<Value, DispatchError> {
        let tool: ToolName = name.parse()?;
        self.invoke_tool(tool, arguments, agent).await
    }

    async fn invoke_tool(
        &self,
        tool: ToolName,
        arguments: &Map<String, Value>,
        agent: &AgentIdentity,
    ) -> Result<Value, DispatchError> {
        let request = routes::route(tool, arguments)?;
        tracing::debug!(
            tool = %tool,
            method = ?request.method,
            path = %request.path,
            agent = %agent.agent_id,
            "forwarding tool call"
        );
        self.backend.send(request, agent).await
    }
}
