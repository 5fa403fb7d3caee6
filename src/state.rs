//! Process-lifetime session state.
//!
//! This module owns the mutable state shared by every entry point: the
//! uploaded codebase context, the interaction history and the last output.
//! Each field sits behind its own `RwLock`; no method holds two locks at once.
//! Nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{Action, Language};

/// Maximum characters kept for history excerpts.
pub const EXCERPT_CHARS: usize = 50;

/// Auxiliary reference text supplied by the user.
#[derive(Debug, Clone, Default)]
pub struct CodebaseContext {
    pub text: String,
    /// Bumped on every replacement; 0 means nothing was uploaded yet.
    pub revision: u64,
}

/// One resolved interaction.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub action: Action,
    pub language: Language,
    pub input_excerpt: String,
    pub output_excerpt: String,
    pub recorded_at: DateTime<Utc>,
}

/// Most recent successful output.
#[derive(Debug, Clone)]
pub struct LastOutput {
    pub text: String,
    pub action: Action,
    pub language: Language,
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

#[derive(Default)]
pub struct SessionState {
    context: RwLock<CodebaseContext>,
    history: RwLock<Vec<HistoryEntry>>,
    last_output: RwLock<Option<LastOutput>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the codebase context wholesale. Returns the new revision.
    pub async fn set_codebase_context(&self, text: String) -> u64 {
        let mut context = self.context.write().await;
        context.text = text;
        context.revision += 1;
        debug!(
            "Codebase context replaced ({} chars, revision {})",
            context.text.len(),
            context.revision
        );
        context.revision
    }

    pub async fn codebase_context(&self) -> CodebaseContext {
        self.context.read().await.clone()
    }

    /// Append a history entry and, for successful outputs, update the last output.
    pub async fn record_interaction(
        &self,
        action: Action,
        language: Language,
        input: &str,
        output: &str,
        succeeded: bool,
    ) {
        {
            let mut history = self.history.write().await;
            history.push(HistoryEntry {
                action,
                language,
                input_excerpt: excerpt(input),
                output_excerpt: excerpt(output),
                recorded_at: Utc::now(),
            });
            debug!("Recorded interaction, history length: {}", history.len());
        }

        if succeeded {
            self.set_last_output(output, action, language).await;
        }
    }

    pub async fn set_last_output(&self, text: &str, action: Action, language: Language) {
        *self.last_output.write().await = Some(LastOutput {
            text: text.to_string(),
            action,
            language,
        });
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.read().await.clone()
    }

    #[cfg(test)]
    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }

    pub async fn last_output(&self) -> Option<LastOutput> {
        self.last_output.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_replacement_bumps_revision() {
        let state = SessionState::new();
        assert_eq!(state.codebase_context().await.revision, 0);
        assert!(state.codebase_context().await.text.is_empty());

        assert_eq!(state.set_codebase_context("first".to_string()).await, 1);
        assert_eq!(state.set_codebase_context("second".to_string()).await, 2);

        let context = state.codebase_context().await;
        assert_eq!(context.text, "second");
        assert_eq!(context.revision, 2);
    }

    #[tokio::test]
    async fn test_history_excerpts_and_order() {
        let state = SessionState::new();
        let long_input = "x".repeat(120);
        state
            .record_interaction(Action::Explain, Language::Python, &long_input, "ok", true)
            .await;
        state
            .record_interaction(
                Action::Test,
                Language::Rust,
                "fn a()",
                "ü".repeat(80).as_str(),
                true,
            )
            .await;

        let history = state.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, Action::Explain);
        assert_eq!(history[0].input_excerpt.len(), EXCERPT_CHARS);
        assert_eq!(history[1].action, Action::Test);
        assert_eq!(history[1].output_excerpt.chars().count(), EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_last_output_only_on_success() {
        let state = SessionState::new();
        assert!(state.last_output().await.is_none());

        state
            .record_interaction(Action::Generate, Language::Go, "in", "good", true)
            .await;
        state
            .record_interaction(Action::Generate, Language::Go, "in", "Error: boom", false)
            .await;

        let last = state.last_output().await.unwrap();
        assert_eq!(last.text, "good");
        assert_eq!(last.language, Language::Go);
        assert_eq!(state.history_len().await, 2);
    }
}
