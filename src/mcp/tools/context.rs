//! Codebase context tool implementation.

use rmcp::{model::*, ErrorData as McpError};
use std::path::Path;

use crate::assistant::Assistant;
use crate::mcp::types::SetCodebaseContextArgs;

use super::common::{tool_error, tool_text};

/// Replace the codebase context from inline text or a file.
pub async fn set_codebase_context(
    assistant: &Assistant,
    args: SetCodebaseContextArgs,
) -> Result<CallToolResult, McpError> {
    let revision = match (args.text, args.path) {
        (Some(text), None) => assistant.set_codebase_context(text).await,
        (None, Some(path)) => match assistant.upload_codebase_context(Path::new(&path)).await {
            Ok(revision) => revision,
            Err(e) => return Ok(tool_error(format!("Error: {:#}", e))),
        },
        (Some(_), Some(_)) => {
            return Ok(tool_error("Error: Provide either text or path, not both"));
        }
        (None, None) => return Ok(tool_error("Error: Provide text or path")),
    };

    Ok(tool_text(format!(
        "Codebase context updated (revision {})",
        revision
    )))
}
