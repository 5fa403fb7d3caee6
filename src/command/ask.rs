use anyhow::Result;
use std::path::PathBuf;

use crate::assistant::Assistant;
use crate::cli::read_code_input;
use crate::domain::{Action, BackendChoice, Language, Request};
use crate::export::render_code_block;

pub struct AskOptions {
    pub action: Action,
    pub language: Language,
    pub model: Option<String>,
    pub file: Option<PathBuf>,
    pub context: Option<PathBuf>,
    pub render: bool,
    pub save: Option<PathBuf>,
}

pub async fn run_ask(assistant: &Assistant, options: AskOptions) -> Result<()> {
    let code = read_code_input(options.file.as_deref())?;

    if let Some(path) = &options.context {
        assistant.upload_codebase_context(path).await?;
    }

    let request = Request::new(
        code,
        options.action,
        options.language,
        BackendChoice::parse_lenient(options.model.as_deref()),
    );
    let response = assistant.respond(&request).await;

    if options.render {
        println!("{}", render_code_block(&response, options.language));
    } else {
        println!("{}", response);
    }

    if let Some(dir) = &options.save {
        match assistant.save_last_output(dir).await {
            Ok(path) => eprintln!("💾 Saved to {}", path.display()),
            Err(e) => eprintln!("⚠️  Nothing saved: {}", e),
        }
    }

    Ok(())
}
