//! The assistant service shared by the CLI and the MCP server.
//!
//! An [`Assistant`] owns the orchestrator, the suggestion throttle and the
//! session state. Front ends hold it behind an `Arc` instead of reaching for
//! globals.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::backend::{Backends, InferenceBackend, LocalBackend, RemoteBackend};
use crate::budget::TokenBudgeter;
use crate::config::Settings;
use crate::domain::{Language, RemoteModel, Request};
use crate::export;
use crate::orchestrator::RequestOrchestrator;
use crate::state::{HistoryEntry, SessionState};
use crate::suggest::SuggestionThrottle;

pub type SharedAssistant = Arc<Assistant>;

pub struct Assistant {
    orchestrator: Arc<RequestOrchestrator>,
    throttle: SuggestionThrottle,
    state: Arc<SessionState>,
}

impl Assistant {
    pub fn new(orchestrator: Arc<RequestOrchestrator>) -> Self {
        let state = orchestrator.state().clone();
        let throttle = SuggestionThrottle::new(orchestrator.clone());
        Self {
            orchestrator,
            throttle,
            state,
        }
    }

    /// Build backends from settings and wire up the service.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut backends = Backends::new();
        for model in [RemoteModel::StarCoder, RemoteModel::CodeLlama] {
            let backend = RemoteBackend::new(
                model,
                settings.endpoints.url_for(model).clone(),
                settings.api_token.clone(),
            )?;
            backends = backends.with_remote(model, Arc::new(backend));
        }

        let local = LocalBackend::load(&settings.local_model_path, settings.local_runner.clone())
            .map(|backend| Arc::new(backend) as Arc<dyn InferenceBackend>);
        backends = backends.with_local(local);

        let orchestrator = RequestOrchestrator::new(
            backends,
            TokenBudgeter::heuristic(),
            settings.orchestrator.clone(),
            Arc::new(SessionState::new()),
        );
        info!(
            "Assistant ready (local model: {})",
            if orchestrator.has_local_backend() {
                "loaded"
            } else {
                "unavailable"
            }
        );

        Ok(Self::new(Arc::new(orchestrator)))
    }

    pub fn orchestrator(&self) -> &Arc<RequestOrchestrator> {
        &self.orchestrator
    }

    pub async fn respond(&self, request: &Request) -> String {
        self.orchestrator.respond(request).await
    }

    pub async fn suggest(&self, input_code: &str, language: Language) -> String {
        self.throttle.suggest(input_code, language).await
    }

    pub async fn set_codebase_context(&self, text: String) -> u64 {
        self.state.set_codebase_context(text).await
    }

    pub async fn upload_codebase_context(&self, path: &Path) -> Result<u64> {
        export::upload_codebase_context(&self.state, path).await
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.state.history().await
    }

    pub async fn save_last_output(&self, dir: &Path) -> Result<PathBuf> {
        export::save_last_output(&self.state, dir).await
    }

    /// Last output as a fenced code block, if any.
    pub async fn render_last_output(&self) -> Option<String> {
        self.state
            .last_output()
            .await
            .map(|last| export::render_code_block(&last.text, last.language))
    }
}
