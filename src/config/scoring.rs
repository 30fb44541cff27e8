// src/config/scoring.rs
//! Scoring configuration (TOML): keyword tiers, relevance threshold, territory table.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::lead::territory::{RegionCfg, Territory, TerritoryTable};
use crate::relevance::{KeywordTiers, RelevanceEngine, DEFAULT_MIN_SCORE, MAX_SCORE};

// --- env defaults & names ---
pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";
pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";
pub const ENV_RELEVANCE_MIN_SCORE: &str = "RELEVANCE_MIN_SCORE";

static BUILTIN: Lazy<ScoringConfig> = Lazy::new(|| {
    let raw = include_str!("../../config/scoring.toml");
    ScoringConfig::from_toml_str(raw).expect("valid built-in scoring config")
});

#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceSection {
    #[serde(default = "default_min_score")]
    pub min_score: u8,
}

impl Default for RelevanceSection {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

fn default_min_score() -> u8 {
    DEFAULT_MIN_SCORE
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub relevance: RelevanceSection,
    #[serde(default)]
    pub keywords: KeywordTiers,
    #[serde(default)]
    pub territories: Vec<RegionCfg>,
    #[serde(default)]
    pub territory_default: Territory,
}

impl ScoringConfig {
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: ScoringConfig = toml::from_str(toml_str)?;
        cfg.relevance.min_score = cfg.relevance.min_score.min(MAX_SCORE);
        cfg.keywords = cfg.keywords.normalized();
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scoring config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing scoring config at {}", path.display()))
    }

    /// The default file as compiled into the binary.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Load with env + fallbacks:
    /// 1) $SCORING_CONFIG_PATH (must exist)
    /// 2) config/scoring.toml
    /// 3) built-in copy
    ///
    /// `RELEVANCE_MIN_SCORE` then overrides the threshold.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(ENV_SCORING_CONFIG_PATH) {
            Ok(p) => Self::from_path(Path::new(&p))?,
            Err(_) => {
                let default_path = PathBuf::from(DEFAULT_SCORING_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_path(&default_path)?
                } else {
                    tracing::debug!("no scoring config on disk, using built-in defaults");
                    Self::builtin()
                }
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// `RELEVANCE_MIN_SCORE` wins over the file; applied on every (re)load.
    pub fn apply_env_overrides(&mut self) {
        if let Some(min) = parse_min_score_env(std::env::var(ENV_RELEVANCE_MIN_SCORE).ok()) {
            self.relevance.min_score = min;
        }
    }

    /// Path the loader (and the hot-reload watcher) reads.
    pub fn config_path() -> PathBuf {
        std::env::var(ENV_SCORING_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCORING_CONFIG_PATH))
    }

    pub fn relevance_engine(&self) -> RelevanceEngine {
        RelevanceEngine::new(self.keywords.clone(), self.relevance.min_score)
    }

    pub fn territory_table(&self) -> TerritoryTable {
        TerritoryTable::new(self.territories.clone(), self.territory_default.clone())
    }
}

// parse optional integer env and clamp to 0..=100
fn parse_min_score_env(raw: Option<String>) -> Option<u8> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|v| v.clamp(0, MAX_SCORE as i64) as u8)
}
