//! reqwest-based marketplace backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde_json::Value;

use super::{Backend, BackendMethod, BackendRequest, DispatchError};
use crate::auth::AgentIdentity;

/// Header carrying the calling agent's id
pub const AGENT_ID_HEADER: &str = "X-Agent-Id";
/// Header marking requests that originate from the MCP gateway
pub const MCP_REQUEST_HEADER: &str = "X-MCP-Request";

/// Forwards requests to the marketplace REST API over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Transport(e.without_url().to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method(method: BackendMethod) -> Method {
        match method {
            BackendMethod::Get => Method::GET,
            BackendMethod::Post => Method::POST,
            BackendMethod::Patch => Method::PATCH,
        }
    }
}

/// Strip the URL from reqwest errors so backend addresses never reach agents
fn transport_error(err: reqwest::Error) -> DispatchError {
    if err.is_timeout() {
        DispatchError::Timeout
    } else {
        DispatchError::Transport(err.without_url().to_string())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send(
        &self,
        request: BackendRequest,
        agent: &AgentIdentity,
    ) -> Result<Value, DispatchError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .client
            .request(Self::method(request.method), url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(AGENT_ID_HEADER, agent.agent_id.as_str())
            .header(MCP_REQUEST_HEADER, "true");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), path = %request.path, "backend server error");
            return Err(DispatchError::Upstream(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| DispatchError::InvalidResponse(e.to_string()))
    }
}
