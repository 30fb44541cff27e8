// src/llm/mod.rs
//! Text-completion collaborator: provider abstraction, local Ollama client,
//! mock/disabled clients, and prompt builders.

pub mod ollama;
pub mod prompt;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::LlmConfig;
pub use ollama::OllamaClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LOCAL_LLM must be set to \"true\"; cloud models are not used")]
    Disabled,
    #[error("LLM request timed out; the model may be too slow or overloaded")]
    Timeout,
    #[error("Ollama server is offline; run: ollama serve")]
    Offline,
    #[error("model \"{model}\" not found; run: ollama pull {model}")]
    ModelNotFound { model: String },
    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("empty response from LLM")]
    Empty,
    #[error("LLM transport error: {0}")]
    Transport(String),
}

/// Result of a reachability probe against the model server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlmStatus {
    pub available: bool,
    pub model_installed: bool,
    pub error: Option<String>,
}

impl LlmStatus {
    pub fn ready() -> Self {
        Self {
            available: true,
            model_installed: true,
            error: None,
        }
    }

    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            model_installed: false,
            error: Some(reason.into()),
        }
    }
}

/// Trait object used by the pipeline and HTTP handlers.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete `prompt` and return the raw model text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
    /// Probe server + model availability. Never fails; problems land in the status.
    async fn status(&self) -> LlmStatus;
    /// Provider name for diagnostics/headers.
    fn provider_name(&self) -> &'static str;
    /// Model identifier for diagnostics.
    fn model(&self) -> &str;
}

pub type DynLlmClient = Arc<dyn LlmClient>;

/// Factory: build a client according to config and environment variables.
///
/// * If `AI_TEST_MODE=mock`, returns a mock client that answers with an empty lead.
/// * Else if the local model is not enabled (`LOCAL_LLM` != "true"), returns a disabled client.
/// * Else the Ollama client.
pub fn build_client_from_config(config: &LlmConfig) -> DynLlmClient {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockClient::new("{}"));
    }
    if !config.enabled {
        return Arc::new(DisabledClient);
    }
    match OllamaClient::new(config.clone()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::warn!(error = %e, "could not build Ollama client; LLM disabled");
            Arc::new(DisabledClient)
        }
    }
}

/// Always fails with [`LlmError::Disabled`].
pub struct DisabledClient;

#[async_trait]
impl LlmClient for DisabledClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
    async fn status(&self) -> LlmStatus {
        LlmStatus::offline(LlmError::Disabled.to_string())
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
    fn model(&self) -> &str {
        "none"
    }
}

/// Deterministic client for tests/local runs: returns a fixed completion.
#[derive(Clone)]
pub struct MockClient {
    pub fixed: String,
}

impl MockClient {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
        }
    }
}

#[async_trait]
impl LlmClient for MockClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        if self.fixed.trim().is_empty() {
            return Err(LlmError::Empty);
        }
        Ok(self.fixed.clone())
    }
    async fn status(&self) -> LlmStatus {
        LlmStatus::ready()
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
    fn model(&self) -> &str {
        "mock"
    }
}
