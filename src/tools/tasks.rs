//! Task creation tool

use serde_json::json;

use crate::protocol::McpTool;

/// Marketplace task categories
pub const TASK_CATEGORIES: [&str; 13] = [
    "pickup_delivery",
    "meeting",
    "document_signing",
    "recon",
    "verification",
    "event_attendance",
    "hardware_setup",
    "real_estate",
    "product_testing",
    "errands",
    "photography",
    "purchases",
    "other",
];

/// Tool for posting a new task (bounty) to the marketplace
pub fn create_task() -> McpTool {
    McpTool::new(
        "create_task",
        "Create a new task that humans can accept. Specify requirements, location, pay, and deadline. The task will appear in the marketplace.",
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Short task title" },
                "description": {
                    "type": "string",
                    "description": "Detailed task description and requirements"
                },
                "category": {
                    "type": "string",
                    "enum": TASK_CATEGORIES,
                    "description": "Task category"
                },
                "location": {
                    "type": "string",
                    "description": "Task location (city/address) or \"remote\""
                },
                "is_remote": {
                    "type": "boolean",
                    "description": "Whether this task can be done remotely"
                },
                "pay_amount": { "type": "number", "description": "Payment amount in USD" },
                "pay_type": {
                    "type": "string",
                    "enum": ["fixed", "hourly"],
                    "description": "Payment structure"
                },
                "deadline": {
                    "type": "string",
                    "description": "ISO 8601 deadline for task completion"
                },
                "required_skills": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Skills required to complete the task"
                },
                "priority": {
                    "type": "string",
                    "enum": ["low", "medium", "high", "urgent"],
                    "default": "medium"
                }
            },
            "required": ["title", "description", "category", "location", "pay_amount"]
        }),
    )
}
