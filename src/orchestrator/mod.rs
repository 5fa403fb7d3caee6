//! Request orchestration.
//!
//! The orchestrator turns a [`Request`] into one text response:
//!
//! 1. serve a cached outcome if one exists;
//! 2. truncate the input and build the action prompt;
//! 3. reject prompts over the total token ceiling;
//! 4. call the local model directly when it was chosen;
//! 5. otherwise try the remote model with exponential backoff, re-asking for
//!    English when an explanation comes back in another language;
//! 6. fall back to the local model when every remote attempt failed;
//! 7. cache the outcome and record it in the session history.
//!
//! Failures are typed ([`AssistError`]) until [`RequestOrchestrator::respond`]
//! renders them to text.

mod cache;
mod error;
mod prompt;

pub use cache::{CacheKey, ResponseCache, DEFAULT_CACHE_CAPACITY};
pub use error::AssistError;

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::backend::{BackendError, Backends, InferenceBackend};
use crate::budget::{
    TokenBudgeter, DEFAULT_CONTEXT_TOKENS, DEFAULT_INPUT_TOKENS, DEFAULT_MAX_NEW_TOKENS,
    MAX_TOTAL_TOKENS,
};
use crate::domain::{Action, BackendChoice, Language, RemoteModel, Request};
use crate::language::is_mostly_english;
use crate::state::{CodebaseContext, SessionState};

/// Final outcome of one resolution.
pub type Resolution = Result<String, AssistError>;

/// Tunables of the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Remote attempts before falling back.
    pub max_attempts: usize,
    /// Delay before the second attempt; doubles for each further attempt.
    pub backoff_unit: Duration,
    pub cache_capacity: usize,
    pub input_tokens: usize,
    pub context_tokens: usize,
    pub max_new_tokens: usize,
    pub max_total_tokens: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            input_tokens: DEFAULT_INPUT_TOKENS,
            context_tokens: DEFAULT_CONTEXT_TOKENS,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            max_total_tokens: MAX_TOTAL_TOKENS,
        }
    }
}

impl OrchestratorConfig {
    fn backoff_delay(&self, attempt: usize) -> Duration {
        let multiplier = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(multiplier)
    }
}

/// Prompt and inputs prepared for one resolution.
struct PreparedPrompt {
    prompt: String,
    input: String,
    context: String,
}

pub struct RequestOrchestrator {
    backends: Backends,
    budgeter: TokenBudgeter,
    config: OrchestratorConfig,
    cache: ResponseCache,
    state: Arc<SessionState>,
}

impl RequestOrchestrator {
    pub fn new(
        backends: Backends,
        budgeter: TokenBudgeter,
        config: OrchestratorConfig,
        state: Arc<SessionState>,
    ) -> Self {
        let cache = ResponseCache::new(config.cache_capacity);
        Self {
            backends,
            budgeter,
            config,
            cache,
            state,
        }
    }

    pub fn budgeter(&self) -> &TokenBudgeter {
        &self.budgeter
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn has_local_backend(&self) -> bool {
        self.backends.has_local()
    }

    #[cfg(test)]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a request and render the outcome as text.
    pub async fn respond(&self, request: &Request) -> String {
        match self.resolve(request).await {
            Ok(text) => text,
            Err(err) => err.to_string(),
        }
    }

    /// Resolve a request, keeping the error kind.
    pub async fn resolve(&self, request: &Request) -> Resolution {
        let context = self.state.codebase_context().await;
        let key = CacheKey {
            request: request.clone(),
            context_revision: (request.action == Action::Generate).then_some(context.revision),
        };

        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache hit for {} request", request.action);
            return self.serve_cached(request, hit).await;
        }

        let _claim = self.cache.claim(&key).await;
        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache filled by concurrent {} request", request.action);
            return self.serve_cached(request, hit).await;
        }

        let outcome = self.execute(request, &context).await;

        match &outcome {
            Ok(_) => self.cache.put(key, outcome.clone()),
            Err(err) if err.is_cacheable() => self.cache.put(key, outcome.clone()),
            Err(err) => debug!("Not caching terminal outcome: {}", err),
        }

        let (text, succeeded) = match &outcome {
            Ok(text) => (text.clone(), true),
            Err(err) => (err.to_string(), false),
        };
        self.state
            .record_interaction(
                request.action,
                request.language,
                &request.input_code,
                &text,
                succeeded,
            )
            .await;

        outcome
    }

    /// A cached success is still the latest output shown; history is not touched.
    async fn serve_cached(&self, request: &Request, hit: Resolution) -> Resolution {
        if let Ok(text) = &hit {
            self.state
                .set_last_output(text, request.action, request.language)
                .await;
        }
        hit
    }

    async fn execute(&self, request: &Request, context: &CodebaseContext) -> Resolution {
        if request.backend == BackendChoice::Local && !self.backends.has_local() {
            warn!("Local model requested but not loaded");
            return Err(AssistError::BackendUnavailable);
        }

        let prepared = self.prepare(request, context)?;

        match request.backend {
            BackendChoice::Local => self.generate_local(&prepared.prompt).await,
            BackendChoice::Remote(model) => {
                self.generate_remote(model, request.action, request.language, &prepared)
                    .await
            }
        }
    }

    /// Truncate inputs, build the prompt and check the total token budget.
    fn prepare(
        &self,
        request: &Request,
        context: &CodebaseContext,
    ) -> Result<PreparedPrompt, AssistError> {
        let input = self
            .budgeter
            .truncate(&request.input_code, self.config.input_tokens);
        if input.len() != request.input_code.len() {
            warn!(
                "Input truncated to {} tokens ({} -> {} chars)",
                self.config.input_tokens,
                request.input_code.chars().count(),
                input.chars().count()
            );
        }

        let context = if request.action == Action::Generate {
            self.budgeter
                .truncate(&context.text, self.config.context_tokens)
        } else {
            String::new()
        };

        let prompt = prompt::build(request.action, request.language, &input, &context);
        let estimated = self.budgeter.estimate(&prompt) + self.config.max_new_tokens;
        if estimated > self.config.max_total_tokens {
            warn!(
                "Rejecting {} request: estimated {} tokens exceeds {}",
                request.action, estimated, self.config.max_total_tokens
            );
            return Err(AssistError::TokenBudgetExceeded {
                estimated,
                limit: self.config.max_total_tokens,
            });
        }

        Ok(PreparedPrompt {
            prompt,
            input,
            context,
        })
    }

    async fn generate_remote(
        &self,
        model: RemoteModel,
        action: Action,
        language: Language,
        prepared: &PreparedPrompt,
    ) -> Resolution {
        let Some(backend) = self.backends.remote(model) else {
            error!("No remote backend configured for {}", model.as_str());
            return self
                .fall_back(language, prepared, 0, "no remote backend configured".to_string())
                .await;
        };

        let max_attempts = self.config.max_attempts;
        let mut prompt = prepared.prompt.clone();
        let mut strengthened = false;
        let mut last_text: Option<String> = None;
        let mut last_error: Option<BackendError> = None;

        for attempt in 0..max_attempts {
            match backend.generate(&prompt, self.config.max_new_tokens).await {
                Ok(text) => {
                    if action.requires_english() && !is_mostly_english(&text) {
                        warn!(
                            "{} returned non-English output (attempt {}/{})",
                            backend.name(),
                            attempt + 1,
                            max_attempts
                        );
                        last_text = Some(text);
                        if !strengthened {
                            prompt = prompt::require_english(&prepared.prompt);
                            strengthened = true;
                        }
                        continue;
                    }
                    return Ok(text);
                }
                Err(err) => {
                    warn!(
                        "{} request failed: {} (attempt {}/{})",
                        backend.name(),
                        err,
                        attempt + 1,
                        max_attempts
                    );
                    last_error = Some(err);
                    if attempt + 1 < max_attempts {
                        let delay = self.config.backoff_delay(attempt);
                        debug!("Retrying in {:?}", delay);
                        sleep(delay).await;
                    }
                }
            }
        }

        if let Some(text) = last_text {
            info!("Attempts exhausted; returning last non-English output");
            return Ok(text);
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".to_string());
        error!(
            "All {} attempts to {} failed: {}",
            max_attempts,
            backend.name(),
            last_error
        );
        self.fall_back(language, prepared, max_attempts, last_error)
            .await
    }

    /// Hand an exhausted remote request to the local model, if loaded.
    async fn fall_back(
        &self,
        language: Language,
        prepared: &PreparedPrompt,
        attempts: usize,
        last_error: String,
    ) -> Resolution {
        if !self.backends.has_local() {
            return Err(AssistError::TransportExhausted {
                attempts,
                last_error,
            });
        }

        warn!("Falling back to local model");
        let prompt = prompt::build(Action::Generate, language, &prepared.input, &prepared.context);
        self.generate_local(&prompt).await
    }

    async fn generate_local(&self, prompt: &str) -> Resolution {
        let Some(local) = self.backends.local() else {
            return Err(AssistError::BackendUnavailable);
        };
        run_local(local.as_ref(), prompt, self.config.max_new_tokens).await
    }
}

async fn run_local(
    backend: &dyn InferenceBackend,
    prompt: &str,
    max_new_tokens: usize,
) -> Resolution {
    backend
        .generate(prompt, max_new_tokens)
        .await
        .map_err(|err| {
            error!("Local generation failed: {}", err);
            AssistError::LocalGeneration(err.to_string())
        })
}
