//! Domain types shared across modules.
//!
//! This module contains the request model used by the orchestrator, the
//! suggestion throttle, the CLI and the MCP tools. Keeping these types here
//! avoids circular dependencies between the backend and orchestrator modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code-assistance operation requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Generate,
    Explain,
    Debug,
    Test,
    Refactor,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Generate,
        Action::Explain,
        Action::Debug,
        Action::Test,
        Action::Refactor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Generate => "generate",
            Action::Explain => "explain",
            Action::Debug => "debug",
            Action::Test => "test",
            Action::Refactor => "refactor",
        }
    }

    /// Actions whose output is prose and must come back in English.
    pub fn requires_english(&self) -> bool {
        matches!(self, Action::Explain | Action::Debug | Action::Refactor)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == needle)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// Programming language of the user's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    Go,
    Rust,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::Cpp,
        Language::Go,
        Language::Rust,
    ];

    /// Human-readable name, as it appears inside prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::Go => "Go",
            Language::Rust => "Rust",
        }
    }

    /// Tag for a fenced code block: lowercase name, with `c++` mapped to `cpp`.
    pub fn code_fence_tag(&self) -> String {
        match self.display_name().to_lowercase().as_str() {
            "c++" => "cpp".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        let alias = match needle.as_str() {
            "cpp" | "cxx" => "c++",
            "js" => "javascript",
            "ts" => "typescript",
            "py" => "python",
            "rs" => "rust",
            "golang" => "go",
            other => other,
        };
        Language::ALL
            .into_iter()
            .find(|l| l.display_name().to_lowercase() == alias)
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

/// Hosted model behind the remote backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteModel {
    #[default]
    StarCoder,
    CodeLlama,
}

impl RemoteModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteModel::StarCoder => "StarCoder",
            RemoteModel::CodeLlama => "CodeLLaMA",
        }
    }
}

/// Which backend should serve a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendChoice {
    Remote(RemoteModel),
    Local,
}

impl BackendChoice {
    /// Parse a user-facing model selection.
    ///
    /// Unknown values (including an empty string) select the default remote
    /// model instead of failing.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        match value.trim().to_lowercase().as_str() {
            "starcoder" => BackendChoice::Remote(RemoteModel::StarCoder),
            "codellama" | "code-llama" => BackendChoice::Remote(RemoteModel::CodeLlama),
            "offline" | "local" => BackendChoice::Local,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendChoice::Remote(model) => model.as_str(),
            BackendChoice::Local => "Offline",
        }
    }
}

impl Default for BackendChoice {
    fn default() -> Self {
        BackendChoice::Remote(RemoteModel::default())
    }
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single code-assistance request.
///
/// All four fields together form the cache identity of the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub input_code: String,
    pub action: Action,
    pub language: Language,
    pub backend: BackendChoice,
}

impl Request {
    pub fn new(
        input_code: impl Into<String>,
        action: Action,
        language: Language,
        backend: BackendChoice,
    ) -> Self {
        Self {
            input_code: input_code.into(),
            action,
            language,
            backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_choice_parsing() {
        assert_eq!(
            BackendChoice::parse_lenient(Some("StarCoder")),
            BackendChoice::Remote(RemoteModel::StarCoder)
        );
        assert_eq!(
            BackendChoice::parse_lenient(Some("CodeLLaMA")),
            BackendChoice::Remote(RemoteModel::CodeLlama)
        );
        assert_eq!(
            BackendChoice::parse_lenient(Some("Offline")),
            BackendChoice::Local
        );
        assert_eq!(
            BackendChoice::parse_lenient(Some("gpt-17")),
            BackendChoice::Remote(RemoteModel::StarCoder)
        );
        assert_eq!(
            BackendChoice::parse_lenient(None),
            BackendChoice::Remote(RemoteModel::StarCoder)
        );
    }

    #[test]
    fn test_language_parsing_and_tags() {
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert!("cobol".parse::<Language>().is_err());

        assert_eq!(Language::Cpp.code_fence_tag(), "cpp");
        assert_eq!(Language::JavaScript.code_fence_tag(), "javascript");
    }

    #[test]
    fn test_action_requires_english() {
        assert!(Action::Explain.requires_english());
        assert!(Action::Debug.requires_english());
        assert!(Action::Refactor.requires_english());
        assert!(!Action::Generate.requires_english());
        assert!(!Action::Test.requires_english());
    }
}
