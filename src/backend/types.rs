//! Request and response types for the hosted inference API.

use serde::{Deserialize, Serialize};

/// Sampling temperature sent with every remote request.
pub(super) const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Generation request body
#[derive(Debug, Serialize)]
pub(super) struct GenerationRequest<'a> {
    pub inputs: &'a str,
    pub parameters: GenerationParameters,
}

/// Generation parameters
#[derive(Debug, Serialize)]
pub(super) struct GenerationParameters {
    pub max_new_tokens: usize,
    pub temperature: f32,
    pub return_full_text: bool,
}

impl GenerationParameters {
    pub fn new(max_new_tokens: usize) -> Self {
        Self {
            max_new_tokens,
            temperature: DEFAULT_TEMPERATURE,
            return_full_text: false,
        }
    }
}

/// One element of the generation response array
#[derive(Debug, Deserialize)]
pub(super) struct GeneratedText {
    pub generated_text: String,
}

/// Extract the generated text from a response body.
///
/// The only accepted shape is a single-element array whose element carries
/// `generated_text`; anything else yields `None`.
pub(super) fn parse_generated_text(body: &str) -> Option<String> {
    let mut items: Vec<GeneratedText> = serde_json::from_str(body).ok()?;
    if items.len() != 1 {
        return None;
    }
    items.pop().map(|item| item.generated_text)
}
