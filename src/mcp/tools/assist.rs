//! Assist and suggest tool implementations.

use rmcp::{model::*, ErrorData as McpError};
use tracing::debug;

use crate::assistant::Assistant;
use crate::domain::{Action, BackendChoice, Request};
use crate::mcp::types::{AssistArgs, SuggestArgs};

use super::common::{parse_language, tool_error, tool_text};

/// Run one action through the orchestrator.
///
/// Orchestrator failures come back as `Error: ...` text in a successful
/// result, the same text the CLI prints.
pub async fn assist(assistant: &Assistant, args: AssistArgs) -> Result<CallToolResult, McpError> {
    let action = match args.action.parse::<Action>() {
        Ok(action) => action,
        Err(e) => return Ok(tool_error(format!("Error: {}", e))),
    };
    let language = match parse_language(&args.language) {
        Ok(language) => language,
        Err(result) => return Ok(result),
    };
    let backend = BackendChoice::parse_lenient(args.model.as_deref());

    debug!("assist: action={} language={} backend={}", action, language, backend);

    let request = Request::new(args.code, action, language, backend);
    Ok(tool_text(assistant.respond(&request).await))
}

pub async fn suggest(
    assistant: &Assistant,
    args: SuggestArgs,
) -> Result<CallToolResult, McpError> {
    let language = match parse_language(&args.language) {
        Ok(language) => language,
        Err(result) => return Ok(result),
    };
    Ok(tool_text(assistant.suggest(&args.code, language).await))
}
