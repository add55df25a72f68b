//! MCP Server implementation
//!
//! Transport-independent JSON-RPC handling: parse the body, validate the
//! envelope, route `initialize`, `tools/list` and `tools/call`. Holds no
//! per-request state; one call is one complete request/response cycle.

mod handlers;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::auth::AgentIdentity;
use crate::backend::Dispatcher;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, RequestId, ServerInfo};
use crate::tools::ToolCatalog;

pub use handlers::*;

/// Response envelope plus the HTTP status it travels with
#[derive(Debug, Clone)]
pub struct RpcReply {
    pub status: StatusCode,
    pub response: JsonRpcResponse,
}

impl RpcReply {
    fn ok(response: JsonRpcResponse) -> Self {
        Self {
            status: StatusCode::OK,
            response,
        }
    }

    fn bad_request(response: JsonRpcResponse) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response,
        }
    }
}

/// MCP Server that handles JSON-RPC requests from authenticated agents
#[derive(Clone)]
pub struct McpServer {
    server_info: ServerInfo,
    catalog: Arc<ToolCatalog>,
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(server_info: ServerInfo, catalog: Arc<ToolCatalog>, dispatcher: Dispatcher) -> Self {
        Self {
            server_info,
            catalog,
            dispatcher,
        }
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Handle a single JSON-RPC request body
    pub async fn handle(&self, body: &[u8], agent: &AgentIdentity) -> RpcReply {
        let raw: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, agent = %agent.agent_id, "unparsable request body");
                return RpcReply::bad_request(JsonRpcResponse::parse_error(e.to_string()));
            }
        };

        let request = match JsonRpcRequest::from_value(raw) {
            Ok(request) => request,
            Err((id, details)) => {
                tracing::debug!(%details, agent = %agent.agent_id, "invalid envelope");
                return RpcReply::bad_request(JsonRpcResponse::invalid_request(id, details));
            }
        };

        RpcReply::ok(self.dispatch(request, agent).await)
    }

    /// Route a validated request by method
    pub async fn dispatch(&self, request: JsonRpcRequest, agent: &AgentIdentity) -> JsonRpcResponse {
        let id = request.id;
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, agent),
            "tools/list" => self.handle_tools_list(id, agent),
            "tools/call" => self.handle_tool_call(id, request.params, agent).await,
            method => {
                tracing::debug!(method, agent = %agent.agent_id, "method not found");
                JsonRpcResponse::method_not_found(id, method)
            }
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, id: RequestId, agent: &AgentIdentity) -> JsonRpcResponse {
        tracing::debug!(method = "initialize", agent = %agent.agent_id, "session initialized");
        JsonRpcResponse::success(id, self.server_info.initialize_result())
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: RequestId, agent: &AgentIdentity) -> JsonRpcResponse {
        tracing::debug!(
            method = "tools/list",
            agent = %agent.agent_id,
            tools = self.catalog.len(),
            "tools listed"
        );
        JsonRpcResponse::success(id, json!({ "tools": self.catalog.list_tools() }))
    }

    /// Handle tools/call request
    async fn handle_tool_call(
        &self,
        id: RequestId,
        params: Option<Value>,
        agent: &AgentIdentity,
    ) -> JsonRpcResponse {
        let params = params.unwrap_or(Value::Null);
        let Some(name) = extract_tool_name(&params) else {
            return JsonRpcResponse::invalid_params(id, "Missing tool name");
        };

        if self.catalog.find_tool(name).is_none() {
            tracing::info!(tool = name, agent = %agent.agent_id, "unknown tool requested");
            return JsonRpcResponse::unknown_tool(id, name);
        }

        let arguments = extract_arguments(&params);
        match self.dispatcher.invoke(name, &arguments, agent).await {
            Ok(result) => match serde_json::to_string_pretty(&result) {
                Ok(text) => {
                    tracing::info!(tool = name, agent = %agent.agent_id, "tool call succeeded");
                    JsonRpcResponse::success(id, text_response(text))
                }
                Err(e) => JsonRpcResponse::internal_error(id, e.to_string()),
            },
            Err(e) => {
                tracing::warn!(tool = name, agent = %agent.agent_id, error = %e, "tool call failed");
                JsonRpcResponse::internal_error(id, e.to_string())
            }
        }
    }
}
