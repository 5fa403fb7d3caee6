//! MCP server implementation.
//!
//! This module contains the CodeAssistMcpServer struct and its tool routing.

use rmcp::{
    handler::server::router::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use std::time::Instant;
use tracing::info;

use crate::assistant::SharedAssistant;

use super::tools;
use super::types::*;

/// CodeAssist MCP Server
#[derive(Clone)]
pub struct CodeAssistMcpServer {
    assistant: SharedAssistant,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CodeAssistMcpServer {
    pub fn new(assistant: SharedAssistant) -> Self {
        Self {
            assistant,
            tool_router: Self::tool_router(),
        }
    }

    /// Generate, explain, debug, test or refactor code
    #[tool(
        name = "assist",
        description = "Run a code assistance action.\n\nActions:\n* generate - write code from a description (uses the codebase context if one is set)\n* explain - explain what the code does\n* debug - find and fix bugs\n* test - write unit tests\n* refactor - improve readability and performance\n\nModels: StarCoder (default), CodeLLaMA, or Offline for the local model. Requests that fail on the hosted models fall back to the local model when it is installed."
    )]
    async fn assist(
        &self,
        Parameters(args): Parameters<AssistArgs>,
    ) -> Result<CallToolResult, McpError> {
        let start_time = Instant::now();
        let result = tools::assist(&self.assistant, args).await;
        info!("assist finished in {} ms", start_time.elapsed().as_millis());
        result
    }

    /// Short completion for partial code
    #[tool(
        name = "suggest",
        description = "Get a short live suggestion (at most 100 characters) for partially typed code. Calls closer than 500 ms apart are paused."
    )]
    async fn suggest(
        &self,
        Parameters(args): Parameters<SuggestArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::suggest(&self.assistant, args).await
    }

    #[tool(
        name = "set_codebase_context",
        description = "Set the codebase context used by the generate action, from inline text or a file path. Replaces any previous context."
    )]
    async fn set_codebase_context(
        &self,
        Parameters(args): Parameters<SetCodebaseContextArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::set_codebase_context(&self.assistant, args).await
    }

    #[tool(
        name = "get_history",
        description = "List the interactions of this session as JSON, oldest first."
    )]
    async fn get_history(
        &self,
        Parameters(args): Parameters<GetHistoryArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_history(&self.assistant, args).await
    }

    #[tool(
        name = "save_last_output",
        description = "Save the most recent successful output to output_<timestamp>.txt."
    )]
    async fn save_last_output(
        &self,
        Parameters(args): Parameters<SaveLastOutputArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::save_last_output(&self.assistant, args).await
    }

    #[tool(
        name = "render_last_output",
        description = "Return the most recent successful output as a fenced code block."
    )]
    async fn render_last_output(
        &self,
        Parameters(args): Parameters<RenderLastOutputArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::render_last_output(&self.assistant, args).await
    }
}

#[tool_handler]
impl ServerHandler for CodeAssistMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "codeassist".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "CodeAssist MCP Server generates, explains, debugs, tests and refactors code using hosted or local models."
                    .to_string(),
            ),
        }
    }
}
