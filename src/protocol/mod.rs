//! Protocol types for MCP and JSON-RPC communication
//!
//! This module contains all protocol-related types.

mod jsonrpc;
mod mcp;

pub use jsonrpc::{
    ErrorObject, JsonRpcRequest, JsonRpcResponse, RequestId, ResponsePayload, INTERNAL_ERROR,
    INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, UNAUTHORIZED,
};
pub use mcp::{McpTool, ServerInfo, PROTOCOL_VERSION};
