//! Local model backend.
//!
//! Generation runs through a llama.cpp-compatible runner executable against a
//! model artifact on disk. The backend exists only if the artifact was present
//! and the runner could be started at startup; there is no lazy reload. Local
//! generation has no timeout and cannot be cancelled once started.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{BackendError, InferenceBackend};

/// Runner executable used when none is configured.
pub const DEFAULT_LOCAL_RUNNER: &str = "llama-cli";

/// Special tokens removed from decoded output.
const SPECIAL_TOKENS: &[&str] = &[
    "<s>",
    "</s>",
    "<|endoftext|>",
    "<pad>",
    "<unk>",
    "[end of text]",
];

pub struct LocalBackend {
    model_path: PathBuf,
    runner: PathBuf,
}

impl LocalBackend {
    /// Load the local model if its artifact exists and the runner starts.
    pub fn load(model_path: &Path, runner: impl Into<PathBuf>) -> Option<Self> {
        if !model_path.is_file() {
            info!(
                "Local model not found at {}; offline fallback disabled",
                model_path.display()
            );
            return None;
        }

        let runner = runner.into();
        if let Err(e) = probe_runner(&runner) {
            warn!(
                "Local runner {} cannot be started ({}); offline fallback disabled",
                runner.display(),
                e
            );
            return None;
        }

        info!("Local model loaded from {}", model_path.display());
        Some(Self {
            model_path: model_path.to_path_buf(),
            runner,
        })
    }
}

/// Start the runner once with `--version`. Only a failure to spawn counts;
/// the exit status is ignored.
fn probe_runner(runner: &Path) -> std::io::Result<()> {
    std::process::Command::new(runner)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|_| ())
}

/// Decode runner output, dropping special tokens.
fn decode_output(raw: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(raw).into_owned();
    for token in SPECIAL_TOKENS {
        text = text.replace(token, "");
    }
    text.trim().to_string()
}

#[async_trait]
impl InferenceBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(&self, prompt: &str, max_new_tokens: usize) -> Result<String, BackendError> {
        debug!(
            "Running local generation with {} (max {} tokens)",
            self.runner.display(),
            max_new_tokens
        );

        let output = Command::new(&self.runner)
            .arg("-m")
            .arg(&self.model_path)
            .arg("-p")
            .arg(prompt)
            .arg("-n")
            .arg(max_new_tokens.to_string())
            .arg("--no-display-prompt")
            .kill_on_drop(false)
            .output()
            .await
            .map_err(|e| {
                BackendError::LocalRunner(format!(
                    "failed to start {}: {}",
                    self.runner.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::LocalRunner(format!(
                "{} exited with {}: {}",
                self.runner.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(decode_output(&output.stdout))
    }
}
