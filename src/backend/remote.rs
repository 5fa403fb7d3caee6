//! HTTP backend for hosted inference endpoints.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::types::{parse_generated_text, GenerationParameters, GenerationRequest};
use super::{BackendError, InferenceBackend};
use crate::domain::RemoteModel;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Text returned when the endpoint answers 2xx with an unexpected payload.
pub const MALFORMED_RESPONSE: &str = "Error: Malformed API response";

const DEFAULT_STARCODER_URL: &str = "https://api-inference.huggingface.co/models/bigcode/starcoder";
const DEFAULT_CODELLAMA_URL: &str =
    "https://api-inference.huggingface.co/models/codellama/CodeLlama-7b-Instruct-hf";

/// Endpoint URLs of the hosted models.
#[derive(Debug, Clone)]
pub struct RemoteEndpoints {
    pub starcoder: Url,
    pub codellama: Url,
}

impl RemoteEndpoints {
    /// Build endpoints, replacing defaults with the given overrides.
    pub fn from_overrides(starcoder: Option<&str>, codellama: Option<&str>) -> Result<Self> {
        let parse = |value: &str| {
            Url::parse(value).with_context(|| format!("Invalid endpoint URL: {}", value))
        };
        Ok(Self {
            starcoder: parse(starcoder.unwrap_or(DEFAULT_STARCODER_URL))?,
            codellama: parse(codellama.unwrap_or(DEFAULT_CODELLAMA_URL))?,
        })
    }

    pub fn url_for(&self, model: RemoteModel) -> &Url {
        match model {
            RemoteModel::StarCoder => &self.starcoder,
            RemoteModel::CodeLlama => &self.codellama,
        }
    }
}

/// One hosted model reachable over HTTP.
///
/// Every call is a single POST; retries belong to the orchestrator.
pub struct RemoteBackend {
    name: String,
    client: Client,
    url: Url,
    access_token: Option<String>,
    timeout_secs: u64,
}

impl RemoteBackend {
    pub fn new(model: RemoteModel, url: Url, access_token: Option<String>) -> Result<Self> {
        Self::with_timeout(model, url, access_token, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        model: RemoteModel,
        url: Url,
        access_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        if access_token.is_none() {
            warn!(
                "No API token configured for {}; requests will be unauthenticated",
                model.as_str()
            );
        }

        Ok(Self {
            name: model.as_str().to_string(),
            client,
            url,
            access_token,
            timeout_secs,
        })
    }

    fn classify_send_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout_secs)
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl InferenceBackend for RemoteBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str, max_new_tokens: usize) -> Result<String, BackendError> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters::new(max_new_tokens),
        };
        let request_id = Uuid::new_v4().to_string();

        debug!("=== Inference Request ===");
        debug!("Model: {}", self.name);
        debug!("URL: {}", self.url);
        debug!("Request ID: {}", request_id);

        let mut request = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .header("x-request-id", &request_id);
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status();
        debug!("=== Inference Response ===");
        debug!("Status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        match parse_generated_text(&response_text) {
            Some(text) => Ok(text),
            None => {
                warn!(
                    "{} returned an unexpected payload ({} bytes)",
                    self.name,
                    response_text.len()
                );
                Ok(MALFORMED_RESPONSE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend_for(server: &MockServer, timeout_secs: u64) -> RemoteBackend {
        let url = Url::parse(&format!("{}/models/starcoder", server.uri())).unwrap();
        RemoteBackend::with_timeout(
            RemoteModel::StarCoder,
            url,
            Some("secret-token".to_string()),
            timeout_secs,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_success_sends_contract() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/starcoder"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "generated_text": "print(1)" }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server, DEFAULT_TIMEOUT_SECS).await;
        let text = backend.generate("Generate code", 512).await.unwrap();
        assert_eq!(text, "print(1)");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["inputs"], "Generate code");
        assert_eq!(body["parameters"]["max_new_tokens"], 512);
        assert_eq!(body["parameters"]["return_full_text"], false);
    }

    #[tokio::test]
    async fn test_malformed_payload_yields_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "error": "Model is loading" })),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server, DEFAULT_TIMEOUT_SECS).await;
        let text = backend.generate("prompt", 16).await.unwrap();
        assert_eq!(text, MALFORMED_RESPONSE);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let backend = backend_for(&server, DEFAULT_TIMEOUT_SECS).await;
        let err = backend.generate("prompt", 16).await.unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "generated_text": "late" }]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server, 1).await;
        let err = backend.generate("prompt", 16).await.unwrap_err();
        assert!(matches!(err, BackendError::Timeout(1)));
    }

    #[test]
    fn test_endpoint_overrides() {
        let endpoints =
            RemoteEndpoints::from_overrides(Some("http://localhost:9000/sc"), None).unwrap();
        assert_eq!(
            endpoints.url_for(RemoteModel::StarCoder).as_str(),
            "http://localhost:9000/sc"
        );
        assert_eq!(
            endpoints.url_for(RemoteModel::CodeLlama).as_str(),
            DEFAULT_CODELLAMA_URL
        );
        assert!(RemoteEndpoints::from_overrides(Some("not a url"), None).is_err());
    }
}
