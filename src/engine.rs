//! # Scoring Engine
//! Pure, testable composition of the relevance filter, the lead scorer and the
//! territory table. No I/O; every operation takes the reference time explicitly.
//!
//! `ScoringHandle` shares one engine across request handlers and lets a dev
//! watcher swap it when `config/scoring.toml` changes.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

use crate::article::{Article, ScoredArticle};
use crate::config::ScoringConfig;
use crate::lead::{CompleteLead, StructuredLead, Territory, TerritoryTable};
use crate::relevance::{Relevance, RelevanceEngine};

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    pub relevance: RelevanceEngine,
    pub territories: TerritoryTable,
}

impl ScoringEngine {
    pub fn from_config(cfg: &ScoringConfig) -> Self {
        Self {
            relevance: cfg.relevance_engine(),
            territories: cfg.territory_table(),
        }
    }

    pub fn builtin() -> Self {
        Self::from_config(&ScoringConfig::builtin())
    }

    pub fn relevance(&self, article: &Article, now: DateTime<Utc>) -> Relevance {
        self.relevance.score(article, now)
    }

    pub fn calculate_relevance_score(&self, article: &Article, now: DateTime<Utc>) -> u8 {
        self.relevance.calculate_relevance_score(article, now)
    }

    pub fn filter_articles(&self, articles: Vec<Article>, now: DateTime<Utc>) -> Vec<ScoredArticle> {
        self.relevance.filter_articles(articles, now)
    }

    pub fn assign_territory(&self, lead: &StructuredLead) -> Territory {
        self.territories.assign(Some(&lead.location))
    }

    pub fn complete_lead(
        &self,
        lead: StructuredLead,
        article: &Article,
        now: DateTime<Utc>,
    ) -> CompleteLead {
        CompleteLead::assemble(lead, article, &self.territories, now)
    }
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// A threadsafe handle that can hot-reload the underlying engine in dev/local.
/// - Enable by setting SCORING_HOT_RELOAD=1
/// - Dev-gated: active only if cfg!(debug_assertions) OR SHUTTLE_ENV is "local"/"development"/"dev".
#[derive(Clone, Default)]
pub struct ScoringHandle {
    inner: Arc<RwLock<Arc<ScoringEngine>>>,
}

impl ScoringHandle {
    pub fn new(engine: ScoringEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(engine))),
        }
    }

    /// Snapshot of the current engine. Callers keep using it even if a reload
    /// lands mid-request.
    pub fn current(&self) -> Arc<ScoringEngine> {
        match self.inner.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, engine: ScoringEngine) {
        match self.inner.write() {
            Ok(mut g) => *g = Arc::new(engine),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(engine),
        }
    }
}

/// Returns true if we should enable hot reload (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var("SCORING_HOT_RELOAD")
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    want && crate::is_dev_env()
}

/// Re-read `path` and swap the engine. A file that fails to load keeps the old engine.
/// Env overrides apply exactly as at startup.
pub fn reload_from_path(handle: &ScoringHandle, path: &std::path::Path) -> anyhow::Result<()> {
    let mut cfg = ScoringConfig::from_path(path)?;
    cfg.apply_env_overrides();
    handle.replace(ScoringEngine::from_config(&cfg));
    info!(path = %path.display(), "scoring config reloaded");
    Ok(())
}

/// Start a simple polling watcher on `path` to hot-reload into `handle`.
/// Polls mtime every 2s.
pub fn start_hot_reload_thread(handle: ScoringHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            if let Ok(mtime) = fs::metadata(&path).and_then(|m| m.modified()) {
                let changed = match last_mtime {
                    None => {
                        last_mtime = Some(mtime);
                        false
                    }
                    Some(prev) => mtime > prev,
                };
                if changed {
                    if let Err(e) = reload_from_path(&handle, &path) {
                        warn!(error = %e, "scoring config reload failed; keeping previous");
                    }
                    last_mtime = Some(mtime);
                }
            }
            thread::sleep(poll);
        }
    });
}
