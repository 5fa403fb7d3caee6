//! Prompt templates keyed by action.

use crate::domain::{Action, Language};

/// Build the prompt for `action` over already-truncated `input`.
///
/// `context` is only used by [`Action::Generate`].
pub fn build(action: Action, language: Language, input: &str, context: &str) -> String {
    match action {
        Action::Generate => format!(
            "Generate {} code for: {}\nContext: {}",
            language, input, context
        ),
        Action::Explain => format!("/* Explain this {} code in English: {} */", language, input),
        Action::Debug => format!(
            "/* Debug this {} code and explain fixes in English: {} */",
            language, input
        ),
        Action::Test => format!("Generate unit tests for this {} code: {}", language, input),
        Action::Refactor => format!(
            "Refactor this {} code for better performance and explain changes in English: {} */",
            language, input
        ),
    }
}

/// Wrap a prompt after its output was rejected as non-English.
pub fn require_english(prompt: &str) -> String {
    format!("/* {} - Output must be in English */", prompt)
}
