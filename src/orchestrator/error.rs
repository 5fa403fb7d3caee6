//! Error kinds produced while resolving a request.
//!
//! Callers of [`super::RequestOrchestrator::respond`] only ever see the
//! rendered text; the typed value is kept for logs, caching decisions and
//! tests.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistError {
    /// Prompt plus generation budget is over the hard ceiling.
    #[error("Error: Input exceeds {limit} token limit (estimated {estimated} tokens)")]
    TokenBudgetExceeded { estimated: usize, limit: usize },

    /// Every remote attempt failed and no local model could take over.
    #[error("Error: API request failed after {attempts} attempts: {last_error}")]
    TransportExhausted { attempts: usize, last_error: String },

    /// The local model was requested or needed but is not loaded.
    #[error("Error: Local model is not available")]
    BackendUnavailable,

    /// The local model was invoked and failed.
    #[error("Error: Local model generation failed: {0}")]
    LocalGeneration(String),
}

impl AssistError {
    /// Whether an outcome carrying this error may be served from the cache.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, AssistError::TokenBudgetExceeded { .. })
    }
}
