// src/lib.rs
// Public library surface for the service binary and integration tests.

pub mod article;
pub mod config;
pub mod engine;
pub mod freshness;
pub mod history;
pub mod lead;
pub mod lenient;
pub mod relevance;

// Collaborators: local LLM, news feed, alert delivery
pub mod ingest;
pub mod llm;
pub mod notify;

// Glue + HTTP surface
pub mod api;
pub mod metrics;
pub mod pipeline;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::article::{Article, ScoredArticle};
pub use crate::engine::{ScoringEngine, ScoringHandle};
pub use crate::lead::{
    calculate_lead_score, CompleteLead, LeadTier, Location, StructuredLead, Territory,
};

/// Dev environment: debug build OR SHUTTLE_ENV in {local, development, dev}.
pub fn is_dev_env() -> bool {
    cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        )
}
