use anyhow::Result;
use std::path::Path;

use crate::assistant::Assistant;
use crate::cli::read_code_input;
use crate::domain::Language;

pub async fn run_suggest(
    assistant: &Assistant,
    language: Language,
    file: Option<&Path>,
) -> Result<()> {
    let code = read_code_input(file)?;
    println!("{}", assistant.suggest(&code, language).await);
    Ok(())
}
