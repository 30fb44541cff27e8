// src/config/mod.rs
pub mod llm;
pub mod scoring;

pub use llm::LlmConfig;
pub use scoring::ScoringConfig;
