//! MCP tool parameter types.
//!
//! These types are used with rmcp's `Parameters<T>` wrapper for automatic
//! deserialization and JSON schema generation.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the assist tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AssistArgs {
    /// The code (or description, for generate) to work on
    pub code: String,
    /// One of: generate, explain, debug, test, refactor
    pub action: String,
    /// Programming language, e.g. python, javascript, c++
    pub language: String,
    /// StarCoder, CodeLLaMA or Offline. Defaults to StarCoder
    #[serde(default)]
    pub model: Option<String>,
}

/// Parameters for the suggest tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SuggestArgs {
    /// Partial code typed so far
    pub code: String,
    /// Programming language of the code
    pub language: String,
}

/// Parameters for the set_codebase_context tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetCodebaseContextArgs {
    /// Context text to use directly
    #[serde(default)]
    pub text: Option<String>,
    /// Path of a file to read the context from
    #[serde(default)]
    pub path: Option<String>,
}

/// Parameters for the get_history tool (no arguments needed)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetHistoryArgs {}

/// Parameters for the save_last_output tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaveLastOutputArgs {
    /// Directory to write into. Defaults to the current directory
    #[serde(default)]
    pub directory: Option<String>,
}

/// Parameters for the render_last_output tool (no arguments needed)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RenderLastOutputArgs {}
