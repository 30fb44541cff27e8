// src/config/llm.rs
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const DEFAULT_LLM_CONFIG_PATH: &str = "config/llm.json";
pub const ENV_LLM_CONFIG_PATH: &str = "LLM_CONFIG_PATH";
/// Must be "true" for the local model to be used at all.
pub const ENV_LOCAL_LLM: &str = "LOCAL_LLM";

fn default_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}
fn default_tags_endpoint() -> String {
    "http://localhost:11434/api/tags".to_string()
}
fn default_model() -> String {
    "qwen2.5:1.5b".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_tags_endpoint")]
    pub tags_endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Resolved from `LOCAL_LLM`, never read from the file.
    #[serde(skip)]
    pub enabled: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            tags_endpoint: default_tags_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            enabled: false,
        }
    }
}

impl LlmConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: LlmConfig = serde_json::from_str(&data)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// `$LLM_CONFIG_PATH` or `config/llm.json`; unreadable → defaults.
    /// `enabled` follows `LOCAL_LLM=true`.
    pub fn from_env() -> Self {
        let path = std::env::var(ENV_LLM_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_LLM_CONFIG_PATH.to_string());
        let mut cfg = match Self::load_from_file(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, %path, "llm config not loaded, using defaults");
                Self::default()
            }
        };
        cfg.enabled = std::env::var(ENV_LOCAL_LLM)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        cfg
    }

    fn sanitize(&mut self) {
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_uses_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"model": "", "timeout_secs": 0}}"#).unwrap();
        let cfg = LlmConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg.model, "qwen2.5:1.5b");
        assert_eq!(cfg.timeout_secs, 60);
        assert_eq!(cfg.endpoint, default_endpoint());
        assert!(!cfg.enabled);
    }

    #[serial_test::serial]
    #[test]
    fn local_llm_flag_enables() {
        std::env::set_var(ENV_LOCAL_LLM, "TRUE");
        assert!(LlmConfig::from_env().enabled);
        std::env::set_var(ENV_LOCAL_LLM, "1");
        assert!(!LlmConfig::from_env().enabled);
        std::env::remove_var(ENV_LOCAL_LLM);
        assert!(!LlmConfig::from_env().enabled);
    }
}
