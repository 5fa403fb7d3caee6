//! Token estimation and prefix-preserving truncation.
//!
//! Two strategies are supported. When a precise [`TokenCounter`] is plugged
//! in, counts come from it; otherwise the characters-to-tokens heuristic
//! (`chars / 4 + 1`) is used. A single budgeter always uses one strategy, so
//! `estimate(truncate(t, m)) <= m` holds for every call.

use std::sync::Arc;

/// Default ceiling for user input, in tokens.
pub const DEFAULT_INPUT_TOKENS: usize = 4000;

/// Maximum number of tokens requested from a backend.
pub const DEFAULT_MAX_NEW_TOKENS: usize = 512;

/// Hard ceiling for prompt plus generated tokens of one request.
pub const MAX_TOTAL_TOKENS: usize = 8192;

/// Ceiling for the codebase context embedded in Generate prompts.
pub const DEFAULT_CONTEXT_TOKENS: usize = 2000;

const CHARS_PER_TOKEN: usize = 4;

/// Precise tokenizer capability.
pub trait TokenCounter: Send + Sync {
    /// Number of subword tokens in `text`.
    fn count(&self, text: &str) -> usize;
}

/// Estimates and enforces token budgets.
#[derive(Clone, Default)]
pub struct TokenBudgeter {
    counter: Option<Arc<dyn TokenCounter>>,
}

impl TokenBudgeter {
    /// Budgeter using the character heuristic.
    pub fn heuristic() -> Self {
        Self { counter: None }
    }

    /// Budgeter backed by a precise tokenizer.
    pub fn with_counter(counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            counter: Some(counter),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.counter.is_some()
    }

    pub fn estimate(&self, text: &str) -> usize {
        match &self.counter {
            Some(counter) => counter.count(text),
            None => heuristic_estimate(text),
        }
    }

    /// Keep the longest prefix of `text` that fits in `max_tokens`.
    pub fn truncate(&self, text: &str, max_tokens: usize) -> String {
        if self.estimate(text) <= max_tokens {
            return text.to_string();
        }

        match &self.counter {
            Some(counter) => truncate_with_counter(counter.as_ref(), text, max_tokens),
            None => heuristic_truncate(text, max_tokens),
        }
    }
}

fn heuristic_estimate(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.chars().count() / CHARS_PER_TOKEN + 1
}

fn heuristic_truncate(text: &str, max_tokens: usize) -> String {
    if max_tokens == 0 {
        return String::new();
    }
    // Largest char count n with n / 4 + 1 <= max_tokens.
    let max_chars = max_tokens * CHARS_PER_TOKEN - 1;
    text.chars().take(max_chars).collect()
}

/// Binary search over char boundaries for the longest fitting prefix.
fn truncate_with_counter(counter: &dyn TokenCounter, text: &str, max_tokens: usize) -> String {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut lo = 0usize;
    let mut hi = boundaries.len() - 1;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if counter.count(&text[..boundaries[mid]]) <= max_tokens {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let prefix = &text[..boundaries[lo]];
    if counter.count(prefix) <= max_tokens {
        prefix.to_string()
    } else {
        // Tokenizer is not monotone on this prefix; empty always fits.
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts whitespace-separated words, a stand-in for a subword tokenizer.
    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    fn samples() -> Vec<String> {
        vec![
            String::new(),
            "a".to_string(),
            "def f(): pass".to_string(),
            "x".repeat(1000),
            "héllo wörld ünïcode ".repeat(50),
            "word ".repeat(300),
            "日本語のテキスト".repeat(40),
        ]
    }

    #[test]
    fn test_heuristic_estimate() {
        let budgeter = TokenBudgeter::heuristic();
        assert_eq!(budgeter.estimate(""), 0);
        assert_eq!(budgeter.estimate("abc"), 1);
        assert_eq!(budgeter.estimate("abcd"), 2);
        assert_eq!(budgeter.estimate(&"x".repeat(400)), 101);
    }

    #[test]
    fn test_truncate_fits_budget_heuristic() {
        let budgeter = TokenBudgeter::heuristic();
        for text in samples() {
            for max in [0, 1, 2, 5, 17, 100, 4000] {
                let truncated = budgeter.truncate(&text, max);
                assert!(budgeter.estimate(&truncated) <= max, "max={max}");
                assert!(text.starts_with(&truncated));
                assert_eq!(budgeter.truncate(&truncated, max), truncated);
            }
        }
    }

    #[test]
    fn test_truncate_fits_budget_exact() {
        let budgeter = TokenBudgeter::with_counter(Arc::new(WordCounter));
        assert!(budgeter.is_exact());
        for text in samples() {
            for max in [0, 1, 3, 10, 250] {
                let truncated = budgeter.truncate(&text, max);
                assert!(budgeter.estimate(&truncated) <= max, "max={max}");
                assert!(text.starts_with(&truncated));
                assert_eq!(budgeter.truncate(&truncated, max), truncated);
            }
        }
    }

    #[test]
    fn test_truncate_keeps_short_text_unchanged() {
        let budgeter = TokenBudgeter::heuristic();
        assert_eq!(budgeter.truncate("print('hi')", 10), "print('hi')");
    }

    #[test]
    fn test_truncate_uses_maximal_prefix() {
        let budgeter = TokenBudgeter::heuristic();
        let truncated = budgeter.truncate(&"x".repeat(100), 5);
        assert_eq!(truncated.len(), 19);

        let exact = TokenBudgeter::with_counter(Arc::new(WordCounter));
        assert_eq!(exact.truncate("one two three four", 2), "one two ");
    }
}
