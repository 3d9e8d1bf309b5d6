//! Inference adapter - Implements InferencePort over an OpenAI-compatible
//! chat-completions provider (Groq by default) using ai_core.

use std::time::Instant;

use ai_core::{ChatCompletionEngine, InferenceConfig, InferenceEngine, InferenceError, InferenceRequest};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, with_retry};

/// Adapter for the hosted classifier model
#[derive(Debug)]
pub struct GroqInferenceAdapter {
    engine: ChatCompletionEngine,
    retry: RetryConfig,
}

impl GroqInferenceAdapter {
    /// Create a new adapter; fails when no API key is configured
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine = ChatCompletionEngine::new(config).map_err(Self::map_error)?;
        Ok(Self {
            engine,
            retry: RetryConfig::default(),
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::MissingApiKey => ApplicationError::Configuration(e.to_string()),
            InferenceError::ConnectionFailed(msg) => {
                ApplicationError::ExternalService(format!("Inference provider unreachable: {msg}"))
            },
            other => ApplicationError::Inference(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for GroqInferenceAdapter {
    #[instrument(skip(self, system_prompt, message), fields(model = %self.engine.default_model(), message_len = message.len()))]
    async fn generate_with_system(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();
        let request = InferenceRequest::with_system(system_prompt, message);

        let outcome = with_retry(&self.retry, || self.engine.generate(request.clone())).await;
        let attempts = outcome.attempts;
        let response = outcome.into_result().map_err(Self::map_error)?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(
            model = %response.model,
            tokens = ?response.usage.as_ref().map(|u| u.total_tokens),
            attempts = attempts,
            latency_ms = latency_ms,
            "Inference completed"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    #[instrument(skip(self))]
    async fn is_healthy(&self) -> bool {
        self.engine.health_check().await.unwrap_or(false)
    }

    fn current_model(&self) -> String {
        self.engine.default_model().to_string()
    }
}
