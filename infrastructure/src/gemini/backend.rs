//! Gemini reasoning backend implementation

use crate::gemini::error::GeminiError;
use crate::gemini::wire::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use std::time::Duration;
use swarm_application::{ReasoningBackend, ReasoningError};
use swarm_domain::ConversationContext;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Reasoning backend backed by a Gemini model.
///
/// One instance is shared by every worker; `reqwest::Client` pools
/// connections internally.
pub struct GeminiReasoningBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiReasoningBackend {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey("api_key".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    /// Read the key from `api_key_env`.
    pub fn from_env(
        api_key_env: &str,
        model: impl Into<String>,
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let key = std::env::var(api_key_env).unwrap_or_default();
        if key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey(api_key_env.to_string()));
        }
        Self::new(key, model, base_url, request_timeout)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, GeminiError> {
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(model = %self.model, status = status.as_u16(), "Gemini request failed");
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response.json().await?;
        if let Some(reason) = body.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }
        let text = body.text().ok_or(GeminiError::Empty)?;
        debug!(model = %self.model, len = text.len(), "Gemini reply received");
        Ok(text)
    }
}

#[async_trait]
impl ReasoningBackend for GeminiReasoningBackend {
    async fn decide(&self, context: &ConversationContext) -> Result<String, ReasoningError> {
        let request = GenerateRequest::for_decision(context);
        Ok(self.generate(&request).await?)
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasoningError> {
        let request = GenerateRequest::for_completion(system, prompt);
        Ok(self.generate(&request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected() {
        let result = GeminiReasoningBackend::new(" ", DEFAULT_MODEL, DEFAULT_BASE_URL, Duration::from_secs(5));
        assert!(matches!(result, Err(GeminiError::MissingApiKey(_))));
    }

    #[test]
    fn missing_env_names_the_variable() {
        let result = GeminiReasoningBackend::from_env(
            "SWARM_TEST_KEY_THAT_IS_NEVER_SET",
            DEFAULT_MODEL,
            DEFAULT_BASE_URL,
            Duration::from_secs(5),
        );
        assert!(
            matches!(result, Err(GeminiError::MissingApiKey(var)) if var == "SWARM_TEST_KEY_THAT_IS_NEVER_SET")
        );
    }

    #[test]
    fn url_includes_model() {
        let backend = GeminiReasoningBackend::new(
            "key",
            "gemini-2.0-flash",
            "https://example.test/v1beta/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            backend.url(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        let backend =
            GeminiReasoningBackend::new("key", DEFAULT_MODEL, "http://127.0.0.1:9", Duration::from_secs(2))
                .unwrap();
        let err = backend.complete("sys", "hello").await.unwrap_err();
        assert!(matches!(
            err,
            ReasoningError::Unavailable(_) | ReasoningError::Timeout
        ));
    }
}
