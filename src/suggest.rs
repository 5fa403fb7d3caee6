//! Live suggestions while the user types.
//!
//! Suggestions go through the orchestrator (and therefore its cache) with the
//! Generate action on the default remote model. A process-wide time gate
//! drops calls that arrive less than [`MIN_INTERVAL`] after the last accepted
//! one.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{Action, BackendChoice, Language, Request};
use crate::orchestrator::RequestOrchestrator;

/// Minimum spacing between accepted suggestion calls.
pub const MIN_INTERVAL: Duration = Duration::from_millis(500);

/// Trimmed inputs shorter than this get a placeholder.
pub const MIN_INPUT_CHARS: usize = 5;

/// Token ceiling for suggestion input.
pub const SUGGESTION_INPUT_TOKENS: usize = 1000;

/// Maximum characters returned per suggestion.
pub const MAX_SUGGESTION_CHARS: usize = 100;

pub const PAUSED_PLACEHOLDER: &str = "Suggestions paused while typing...";
pub const START_TYPING_PLACEHOLDER: &str = "Start typing to see suggestions...";

pub struct SuggestionThrottle {
    orchestrator: Arc<RequestOrchestrator>,
    min_interval: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl SuggestionThrottle {
    pub fn new(orchestrator: Arc<RequestOrchestrator>) -> Self {
        Self {
            orchestrator,
            min_interval: MIN_INTERVAL,
            last_accepted: Mutex::new(None),
        }
    }

    /// Accept the call if the gate is open, recording the acceptance time.
    fn try_accept(&self) -> bool {
        let mut last = self.last_accepted.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if let Some(previous) = *last {
            if now.duration_since(previous) < self.min_interval {
                return false;
            }
        }
        *last = Some(now);
        true
    }

    pub async fn suggest(&self, input_code: &str, language: Language) -> String {
        if !self.try_accept() {
            debug!("Suggestion throttled");
            return PAUSED_PLACEHOLDER.to_string();
        }

        if input_code.trim().chars().count() < MIN_INPUT_CHARS {
            return START_TYPING_PLACEHOLDER.to_string();
        }

        let input = self
            .orchestrator
            .budgeter()
            .truncate(input_code, SUGGESTION_INPUT_TOKENS);
        let request = Request::new(input, Action::Generate, language, BackendChoice::default());
        let response = self.orchestrator.respond(&request).await;

        response.chars().take(MAX_SUGGESTION_CHARS).collect()
    }
}
