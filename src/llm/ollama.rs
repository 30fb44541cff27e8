// src/llm/ollama.rs
//! Local Ollama client (`/api/generate`, non-streaming) with status probe on `/api/tags`.

use async_trait::async_trait;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LlmClient, LlmError, LlmStatus};
use crate::config::LlmConfig;

const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

pub struct OllamaClient {
    http: reqwest::Client,
    cfg: LlmConfig,
}

#[derive(Serialize)]
struct GenerateReq<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResp {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResp {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

impl OllamaClient {
    pub fn new(cfg: LlmConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("lead-intel/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self { http, cfg })
    }

    fn classify(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout
        } else if e.is_connect() {
            LlmError::Offline
        } else {
            LlmError::Transport(e.to_string())
        }
    }
}

/// Map a non-2xx generate response to an error.
pub(crate) fn error_for_status(status: u16, body: String, model: &str) -> LlmError {
    let lower = body.to_ascii_lowercase();
    if status == 404 || (lower.contains("model") && lower.contains("not found")) {
        LlmError::ModelNotFound {
            model: model.to_string(),
        }
    } else {
        LlmError::Api { status, body }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        tracing::debug!(model = %self.cfg.model, prompt_chars = prompt.len(), "llm generate");
        let req = GenerateReq {
            model: &self.cfg.model,
            prompt,
            stream: false,
        };
        let result = async {
            let resp = self
                .http
                .post(&self.cfg.endpoint)
                .json(&req)
                .send()
                .await
                .map_err(|e| self.classify(e))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(error_for_status(status.as_u16(), body, &self.cfg.model));
            }
            let body: GenerateResp = resp.json().await.map_err(|e| self.classify(e))?;
            if body.response.trim().is_empty() {
                return Err(LlmError::Empty);
            }
            Ok(body.response)
        }
        .await;

        if let Err(e) = &result {
            counter!("llm_errors_total").increment(1);
            tracing::warn!(error = %e, "llm generate failed");
        }
        result
    }

    async fn status(&self) -> LlmStatus {
        let resp = match self
            .http
            .get(&self.cfg.tags_endpoint)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            Ok(_) => return LlmStatus::offline("Ollama server not responding"),
            Err(_) => return LlmStatus::offline(LlmError::Offline.to_string()),
        };
        let tags: TagsResp = match resp.json().await {
            Ok(t) => t,
            Err(_) => return LlmStatus::offline("Ollama returned an unreadable model list"),
        };
        let model_installed = tags.models.iter().any(|m| m.name.contains(&self.cfg.model));
        LlmStatus {
            available: true,
            model_installed,
            error: (!model_installed).then(|| {
                LlmError::ModelNotFound {
                    model: self.cfg.model.clone(),
                }
                .to_string()
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.cfg.model
    }
}
