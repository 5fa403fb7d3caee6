//! Last-output export tool implementations.

use rmcp::{model::*, ErrorData as McpError};
use std::path::PathBuf;

use crate::assistant::Assistant;
use crate::mcp::types::{RenderLastOutputArgs, SaveLastOutputArgs};

use super::common::{tool_error, tool_text};

pub async fn save_last_output(
    assistant: &Assistant,
    args: SaveLastOutputArgs,
) -> Result<CallToolResult, McpError> {
    let dir = args
        .directory
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    match assistant.save_last_output(&dir).await {
        Ok(path) => Ok(tool_text(format!("Saved to {}", path.display()))),
        Err(e) => Ok(tool_error(format!("Error: {:#}", e))),
    }
}

pub async fn render_last_output(
    assistant: &Assistant,
    _args: RenderLastOutputArgs,
) -> Result<CallToolResult, McpError> {
    match assistant.render_last_output().await {
        Some(rendered) => Ok(tool_text(rendered)),
        None => Ok(tool_error("Error: No output yet")),
    }
}
