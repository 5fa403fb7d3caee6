//! Runtime settings.
//!
//! Settings come from command-line flags, each of which falls back to an
//! environment variable (see [`crate::cli::Cli`]). The API token additionally
//! honours `HF_API_TOKEN` when `CODEASSIST_API_TOKEN` is unset.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

use crate::backend::RemoteEndpoints;
use crate::cli::Cli;
use crate::orchestrator::OrchestratorConfig;

/// Secondary environment variable for the API token.
pub const HF_TOKEN_ENV: &str = "HF_API_TOKEN";

/// Default location of the local model artifact, relative to the home directory.
const DEFAULT_LOCAL_MODEL: &str = ".codeassist/models/local-model.gguf";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_token: Option<String>,
    pub endpoints: RemoteEndpoints,
    pub local_model_path: PathBuf,
    pub local_runner: PathBuf,
    pub orchestrator: OrchestratorConfig,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let api_token = resolve_api_token(cli.api_token.clone());
        let endpoints = RemoteEndpoints::from_overrides(
            cli.starcoder_url.as_deref(),
            cli.codellama_url.as_deref(),
        )?;
        let local_model_path = match &cli.local_model {
            Some(path) => path.clone(),
            None => default_local_model_path()?,
        };

        debug!("StarCoder endpoint: {}", endpoints.starcoder);
        debug!("CodeLLaMA endpoint: {}", endpoints.codellama);
        debug!("Local model path: {}", local_model_path.display());

        Ok(Self {
            api_token,
            endpoints,
            local_model_path,
            local_runner: PathBuf::from(&cli.local_runner),
            orchestrator: OrchestratorConfig::default(),
        })
    }
}

/// Pick the explicit token, else `HF_API_TOKEN`. Blank values count as unset.
fn resolve_api_token(explicit: Option<String>) -> Option<String> {
    explicit
        .or_else(|| std::env::var(HF_TOKEN_ENV).ok())
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn default_local_model_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Could not determine home directory")?
        .join(DEFAULT_LOCAL_MODEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvVarRestore {
        prev: Option<String>,
    }

    impl EnvVarRestore {
        fn new() -> Self {
            Self {
                prev: std::env::var(HF_TOKEN_ENV).ok(),
            }
        }
    }

    impl Drop for EnvVarRestore {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => std::env::set_var(HF_TOKEN_ENV, value),
                None => std::env::remove_var(HF_TOKEN_ENV),
            }
        }
    }

    #[test]
    fn test_explicit_token_wins() {
        let _env_lock_guard = env_lock().lock().unwrap();
        let _env_restore = EnvVarRestore::new();
        std::env::set_var(HF_TOKEN_ENV, "from-env");
        assert_eq!(
            resolve_api_token(Some("explicit".to_string())),
            Some("explicit".to_string())
        );
    }

    #[test]
    fn test_hf_token_fallback() {
        let _env_lock_guard = env_lock().lock().unwrap();
        let _env_restore = EnvVarRestore::new();
        std::env::set_var(HF_TOKEN_ENV, "from-env");
        assert_eq!(resolve_api_token(None), Some("from-env".to_string()));

        std::env::set_var(HF_TOKEN_ENV, "   ");
        assert_eq!(resolve_api_token(None), None);

        std::env::remove_var(HF_TOKEN_ENV);
        assert_eq!(resolve_api_token(None), None);
    }

    #[test]
    fn test_default_local_model_path() {
        if let Ok(path) = default_local_model_path() {
            assert!(path.ends_with("local-model.gguf"));
        }
    }
}
