//! Inference backends.
//!
//! A backend turns a prompt into generated text. Two implementations exist:
//! [`RemoteBackend`] talks to a hosted inference endpoint over HTTP, and
//! [`LocalBackend`] runs a model artifact on this machine. The orchestrator
//! only sees the [`InferenceBackend`] trait.

mod local;
mod remote;
mod types;

pub use local::{LocalBackend, DEFAULT_LOCAL_RUNNER};
pub use remote::{RemoteBackend, RemoteEndpoints, MALFORMED_RESPONSE};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::RemoteModel;

/// Failure of a single generation call.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("local runner error: {0}")]
    LocalRunner(String),
}

/// Capability to execute one generation request.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, max_new_tokens: usize) -> Result<String, BackendError>;
}

/// The set of backends available to the orchestrator.
#[derive(Clone, Default)]
pub struct Backends {
    remote: HashMap<RemoteModel, Arc<dyn InferenceBackend>>,
    local: Option<Arc<dyn InferenceBackend>>,
}

impl Backends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remote(mut self, model: RemoteModel, backend: Arc<dyn InferenceBackend>) -> Self {
        self.remote.insert(model, backend);
        self
    }

    pub fn with_local(mut self, backend: Option<Arc<dyn InferenceBackend>>) -> Self {
        self.local = backend;
        self
    }

    /// Backend for `model`, falling back to the default model's backend.
    pub fn remote(&self, model: RemoteModel) -> Option<&Arc<dyn InferenceBackend>> {
        self.remote
            .get(&model)
            .or_else(|| self.remote.get(&RemoteModel::default()))
    }

    pub fn local(&self) -> Option<&Arc<dyn InferenceBackend>> {
        self.local.as_ref()
    }

    pub fn has_local(&self) -> bool {
        self.local.is_some()
    }
}
