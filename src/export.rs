//! Upload, download and display helpers around the session state.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::Language;
use crate::state::SessionState;

/// Read a file as codebase context, replacing the previous one.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub async fn upload_codebase_context(state: &SessionState, path: &Path) -> Result<u64> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read codebase context from {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let revision = state.set_codebase_context(text).await;
    info!(
        "Loaded codebase context from {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(revision)
}

/// File name for an export made at `at`.
pub fn output_file_name(at: DateTime<Local>) -> String {
    format!("output_{}.txt", at.format("%Y%m%d_%H%M%S"))
}

/// Write the last output to `output_<YYYYMMDD_HHMMSS>.txt` inside `dir`.
pub async fn save_last_output(state: &SessionState, dir: &Path) -> Result<PathBuf> {
    let last = state
        .last_output()
        .await
        .context("No output to save yet")?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let path = dir.join(output_file_name(Local::now()));
    fs::write(&path, &last.text)
        .with_context(|| format!("Failed to write output to {}", path.display()))?;

    info!("Saved {} output to {}", last.action, path.display());
    Ok(path)
}

/// Render text as a fenced code block tagged with the language.
pub fn render_code_block(text: &str, language: Language) -> String {
    format!("```{}\n{}\n```", language.code_fence_tag(), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Action;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_output_file_name_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(output_file_name(at), "output_20240309_070501.txt");
    }

    #[test]
    fn test_render_code_block() {
        assert_eq!(
            render_code_block("int main() {}", Language::Cpp),
            "```cpp\nint main() {}\n```"
        );
        assert_eq!(
            render_code_block("x = 1", Language::Python),
            "```python\nx = 1\n```"
        );
    }

    #[tokio::test]
    async fn test_save_last_output_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let state = SessionState::new();
        state
            .record_interaction(
                Action::Test,
                Language::Python,
                "def f()",
                "def test_f(): ...",
                true,
            )
            .await;

        let path = save_last_output(&state, temp_dir.path()).await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("output_") && name.ends_with(".txt"));
        assert_eq!(name.len(), "output_YYYYMMDD_HHMMSS.txt".len());
        assert_eq!(fs::read_to_string(&path).unwrap(), "def test_f(): ...");
    }

    #[tokio::test]
    async fn test_save_without_output_fails() {
        let temp_dir = TempDir::new().unwrap();
        let state = SessionState::new();
        assert!(save_last_output(&state, temp_dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_replaces_context() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.py");
        let second = temp_dir.path().join("b.py");
        fs::write(&first, "import os").unwrap();
        fs::write(&second, b"caf\xe9").unwrap();

        let state = SessionState::new();
        upload_codebase_context(&state, &first).await.unwrap();
        let revision = upload_codebase_context(&state, &second).await.unwrap();

        let context = state.codebase_context().await;
        assert_eq!(revision, 2);
        assert_eq!(context.text, "caf\u{FFFD}");
    }
}
