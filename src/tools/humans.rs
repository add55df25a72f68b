//! Human discovery tools

use serde_json::json;

use crate::protocol::McpTool;

/// Tool for searching available humans by location, skills and rate
pub fn search_humans() -> McpTool {
    McpTool::new(
        "search_humans",
        "Search for available humans by location, skills, availability, and rating. Returns matched human profiles with their capabilities and rates.",
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City or region to search (e.g. \"San Francisco\", \"Tokyo\")"
                },
                "skills": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Required skills (e.g. [\"photography\", \"mandarin\", \"driving\"])"
                },
                "min_rating": {
                    "type": "number",
                    "description": "Minimum rating threshold (1-5)",
                    "minimum": 1,
                    "maximum": 5
                },
                "max_rate": {
                    "type": "number",
                    "description": "Maximum hourly rate in USD"
                },
                "available_now": {
                    "type": "boolean",
                    "description": "Only return currently available humans"
                },
                "limit": {
                    "type": "number",
                    "description": "Max results to return (default 10)",
                    "default": 10
                }
            }
        }),
    )
}

/// Tool for fetching one human's full profile
pub fn get_human_profile() -> McpTool {
    McpTool::new(
        "get_human_profile",
        "Get detailed profile of a specific human including skills, reviews, availability calendar, and completed task history.",
        json!({
            "type": "object",
            "properties": {
                "human_id": {
                    "type": "string",
                    "description": "The unique ID of the human"
                }
            },
            "required": ["human_id"]
        }),
    )
}
