use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read code from `file`, or from stdin when no file is given.
pub fn read_code_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read code from {}", path.display()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read code from stdin")?;
            Ok(input)
        }
    }
}
