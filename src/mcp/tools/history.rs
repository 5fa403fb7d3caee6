//! History tool implementation.

use rmcp::{model::*, ErrorData as McpError};

use crate::assistant::Assistant;
use crate::mcp::types::GetHistoryArgs;

use super::common::{tool_error, tool_text};

/// Return recorded interactions as a JSON array, oldest first.
pub async fn get_history(
    assistant: &Assistant,
    _args: GetHistoryArgs,
) -> Result<CallToolResult, McpError> {
    let history = assistant.history().await;
    match serde_json::to_string_pretty(&history) {
        Ok(json) => Ok(tool_text(json)),
        Err(e) => Ok(tool_error(format!("Error serializing history: {}", e))),
    }
}
