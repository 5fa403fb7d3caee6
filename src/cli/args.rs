use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::backend::DEFAULT_LOCAL_RUNNER;
use crate::domain::{Action, Language};

/// codeassist - code generation, explanation and review with remote and local models
#[derive(Parser)]
#[command(name = "codeassist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as MCP server over stdio
    #[arg(long)]
    pub mcp: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bearer token for the hosted inference API (falls back to HF_API_TOKEN)
    #[arg(long, env = "CODEASSIST_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Override the StarCoder endpoint URL
    #[arg(long, env = "CODEASSIST_STARCODER_URL")]
    pub starcoder_url: Option<String>,

    /// Override the CodeLLaMA endpoint URL
    #[arg(long, env = "CODEASSIST_CODELLAMA_URL")]
    pub codellama_url: Option<String>,

    /// Local model artifact. Defaults to ~/.codeassist/models/local-model.gguf
    #[arg(long, env = "CODEASSIST_LOCAL_MODEL")]
    pub local_model: Option<PathBuf>,

    /// Executable that runs the local model
    #[arg(long, env = "CODEASSIST_LOCAL_RUNNER", default_value = DEFAULT_LOCAL_RUNNER)]
    pub local_runner: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one action over a piece of code
    Ask {
        /// generate, explain, debug, test or refactor
        #[arg(short, long)]
        action: Action,

        /// Language of the code (python, javascript, c++, ...)
        #[arg(short, long, default_value = "python")]
        language: Language,

        /// StarCoder, CodeLLaMA or Offline; unknown values use StarCoder
        #[arg(short, long)]
        model: Option<String>,

        /// Read code from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// File to use as codebase context for generate
        #[arg(long)]
        context: Option<PathBuf>,

        /// Print the result inside a fenced code block
        #[arg(long)]
        render: bool,

        /// Also save the result to output_<timestamp>.txt in this directory
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Get a short live suggestion for partial code
    Suggest {
        /// Language of the code
        #[arg(short, long, default_value = "python")]
        language: Language,

        /// Read code from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show configured endpoints and local model availability
    Status,
}
