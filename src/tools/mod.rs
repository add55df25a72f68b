//! MCP tool catalog
//!
//! The nine marketplace tools advertised to agents, organized by category:
//! - Human tools (2): search and profile lookup
//! - Task tools (1): bounty creation
//! - Booking tools (5): booking lifecycle
//! - Platform tools (1): statistics
//!
//! Every tool is a [`ToolName`] variant. Definitions and backend routes are
//! both exhaustive matches over that enum, so a tool cannot be advertised
//! without a route (or routed without being advertised).

pub mod bookings;
pub mod humans;
pub mod platform;
pub mod tasks;

use std::fmt;
use std::str::FromStr;

use crate::protocol::McpTool;

/// Closed set of tools the gateway can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    SearchHumans,
    GetHumanProfile,
    CreateTask,
    CreateBooking,
    GetBookingStatus,
    ListBookings,
    SubmitReview,
    CancelBooking,
    GetPlatformStats,
}

impl ToolName {
    /// All tools in advertised order
    pub const ALL: [ToolName; 9] = [
        ToolName::SearchHumans,
        ToolName::GetHumanProfile,
        ToolName::CreateTask,
        ToolName::CreateBooking,
        ToolName::GetBookingStatus,
        ToolName::ListBookings,
        ToolName::SubmitReview,
        ToolName::CancelBooking,
        ToolName::GetPlatformStats,
    ];

    /// Wire name of the tool
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::SearchHumans => "search_humans",
            ToolName::GetHumanProfile => "get_human_profile",
            ToolName::CreateTask => "create_task",
            ToolName::CreateBooking => "create_booking",
            ToolName::GetBookingStatus => "get_booking_status",
            ToolName::ListBookings => "list_bookings",
            ToolName::SubmitReview => "submit_review",
            ToolName::CancelBooking => "cancel_booking",
            ToolName::GetPlatformStats => "get_platform_stats",
        }
    }

    /// Get the tool definition for tools/list
    pub fn definition(&self) -> McpTool {
        match self {
            ToolName::SearchHumans => humans::search_humans(),
            ToolName::GetHumanProfile => humans::get_human_profile(),
            ToolName::CreateTask => tasks::create_task(),
            ToolName::CreateBooking => bookings::create_booking(),
            ToolName::GetBookingStatus => bookings::get_booking_status(),
            ToolName::ListBookings => bookings::list_bookings(),
            ToolName::SubmitReview => bookings::submit_review(),
            ToolName::CancelBooking => bookings::cancel_booking(),
            ToolName::GetPlatformStats => platform::get_platform_stats(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known tool
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Read-only registry of tool definitions, built once per process
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<(ToolName, McpTool)>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: ToolName::ALL
                .iter()
                .map(|tool| (*tool, tool.definition()))
                .collect(),
        }
    }

    /// All tool definitions, in stable order
    pub fn list_tools(&self) -> Vec<&McpTool> {
        self.tools.iter().map(|(_, def)| def).collect()
    }

    /// Look up a tool by its wire name
    pub fn find_tool(&self, name: &str) -> Option<(ToolName, &McpTool)> {
        self.tools
            .iter()
            .find(|(_, def)| def.name == name)
            .map(|(tool, def)| (*tool, def))
    }

    /// Get the number of advertised tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}
