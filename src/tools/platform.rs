//! Platform statistics tool

use serde_json::json;

use crate::protocol::McpTool;

pub fn get_platform_stats() -> McpTool {
    McpTool::new(
        "get_platform_stats",
        "Get current platform statistics including available humans, active tasks, and response times by region.",
        json!({
            "type": "object",
            "properties": {
                "region": {
                    "type": "string",
                    "description": "Filter stats by region (optional)"
                }
            }
        }),
    )
}
