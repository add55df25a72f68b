//! Booking lifecycle tools

use serde_json::json;

use crate::protocol::McpTool;

/// Payment rails a booking can be escrowed on
pub const PAYMENT_METHODS: [&str; 10] = [
    "usdc_ethereum",
    "usdc_polygon",
    "usdc_base",
    "usdt_trc20",
    "usdt_erc20",
    "eth",
    "btc",
    "sol",
    "wechat_pay",
    "alipay",
];

/// Booking states an agent can filter on
pub const BOOKING_STATUSES: [&str; 5] =
    ["pending", "accepted", "in_progress", "completed", "cancelled"];

pub fn create_booking() -> McpTool {
    McpTool::new(
        "create_booking",
        "Book a specific human for a task. Creates a binding agreement and initiates the escrow payment flow.",
        json!({
            "type": "object",
            "properties": {
                "task_id": { "type": "string", "description": "The task to book for" },
                "human_id": { "type": "string", "description": "The human to book" },
                "payment_method": {
                    "type": "string",
                    "enum": PAYMENT_METHODS,
                    "description": "Payment method to use"
                },
                "message": { "type": "string", "description": "Optional message to the human" },
                "scheduled_at": {
                    "type": "string",
                    "description": "ISO 8601 datetime for when the task should be performed"
                }
            },
            "required": ["task_id", "human_id", "payment_method"]
        }),
    )
}

pub fn get_booking_status() -> McpTool {
    McpTool::new(
        "get_booking_status",
        "Check the current status of a booking including task progress, payment status, and any messages from the human.",
        json!({
            "type": "object",
            "properties": {
                "booking_id": { "type": "string", "description": "The booking ID to check" }
            },
            "required": ["booking_id"]
        }),
    )
}

pub fn list_bookings() -> McpTool {
    McpTool::new(
        "list_bookings",
        "List all bookings for the authenticated agent, optionally filtered by status.",
        json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "enum": BOOKING_STATUSES,
                    "description": "Filter by booking status"
                },
                "limit": { "type": "number", "description": "Max results (default 20)", "default": 20 },
                "offset": { "type": "number", "description": "Pagination offset", "default": 0 }
            }
        }),
    )
}

pub fn submit_review() -> McpTool {
    McpTool::new(
        "submit_review",
        "Submit a review for a completed booking. Ratings affect the human's profile score.",
        json!({
            "type": "object",
            "properties": {
                "booking_id": { "type": "string", "description": "The completed booking to review" },
                "rating": {
                    "type": "number",
                    "description": "Rating from 1-5 stars",
                    "minimum": 1,
                    "maximum": 5
                },
                "comment": { "type": "string", "description": "Written review text" }
            },
            "required": ["booking_id", "rating"]
        }),
    )
}

pub fn cancel_booking() -> McpTool {
    McpTool::new(
        "cancel_booking",
        "Cancel an active booking. Refund policy depends on cancellation timing and booking status.",
        json!({
            "type": "object",
            "properties": {
                "booking_id": { "type": "string", "description": "The booking to cancel" },
                "reason": { "type": "string", "description": "Reason for cancellation" }
            },
            "required": ["booking_id"]
        }),
    )
}
