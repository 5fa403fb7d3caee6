//! Common utilities for MCP tools.

use rmcp::model::{CallToolResult, Content};

use crate::domain::Language;

/// Error result for tool failures
pub fn tool_error(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

/// Successful text result
pub fn tool_text(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Parse a language argument, returning a tool error for unknown names.
pub fn parse_language(value: &str) -> Result<Language, CallToolResult> {
    value
        .parse::<Language>()
        .map_err(|e| tool_error(format!("Error: {}", e)))
}
