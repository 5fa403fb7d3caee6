use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

mod assistant;
mod backend;
mod budget;
mod cli;
mod command;
mod config;
mod domain;
mod export;
mod language;
mod mcp;
mod orchestrator;
mod state;
mod suggest;

use assistant::Assistant;
use cli::{Cli, Commands};
use command::AskOptions;
use config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_cli(&cli)?;
    let assistant = Arc::new(Assistant::from_settings(&settings)?);

    if cli.mcp {
        return mcp::run_mcp_server(assistant).await;
    }

    match cli.command {
        Some(Commands::Ask {
            action,
            language,
            model,
            file,
            context,
            render,
            save,
        }) => {
            let options = AskOptions {
                action,
                language,
                model,
                file,
                context,
                render,
                save,
            };
            command::run_ask(&assistant, options).await?;
        }
        Some(Commands::Suggest { language, file }) => {
            command::run_suggest(&assistant, language, file.as_deref()).await?;
        }
        Some(Commands::Status) => {
            command::run_status(&settings, &assistant).await?;
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'codeassist ask --action explain' to run an action or 'codeassist --mcp' to start the MCP server.");
        }
    }

    Ok(())
}
