//! Article → LLM extraction → validated lead → score + territory.

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use thiserror::Error;

use crate::article::Article;
use crate::engine::ScoringHandle;
use crate::ingest::fetch_news;
use crate::ingest::types::NewsProvider;
use crate::lead::extract::{extract_json_object, preview, ExtractError};
use crate::lead::{CompleteLead, StructuredLead};
use crate::llm::{prompt, DynLlmClient, LlmError};

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Failed to parse AI response: {source}")]
    Parse {
        source: ExtractError,
        raw_preview: String,
    },
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindLeadsReport {
    pub fetched: usize,
    pub relevant: usize,
    pub processed: usize,
    pub failed: usize,
    pub is_demo: bool,
    /// Sorted by `lead_score` descending.
    pub leads: Vec<CompleteLead>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Clone)]
pub struct LeadPipeline {
    llm: DynLlmClient,
    scoring: ScoringHandle,
}

impl LeadPipeline {
    pub fn new(llm: DynLlmClient, scoring: ScoringHandle) -> Self {
        Self { llm, scoring }
    }

    pub fn llm(&self) -> &DynLlmClient {
        &self.llm
    }

    /// Run the extraction prompt for `article` and assemble the complete lead.
    pub async fn process_article(
        &self,
        article: &Article,
        now: DateTime<Utc>,
    ) -> Result<CompleteLead, PipelineError> {
        tracing::info!(
            provider = self.llm.provider_name(),
            title = %preview(&article.title, 50),
            "processing article"
        );
        let raw = self.llm.generate(&prompt::extraction_prompt(article)).await?;
        let lead = parse_completion(&raw)?;

        let complete = self.scoring.current().complete_lead(lead, article, now);
        counter!("leads_processed_total").increment(1);
        histogram!("lead_score").record(complete.lead_score as f64);
        tracing::info!(
            company = %complete.lead.company_name,
            score = complete.lead_score,
            region = %complete.assigned_territory.region,
            "lead processed"
        );
        Ok(complete)
    }

    /// Fetch news, keep relevant articles, extract each one. Articles whose
    /// extraction fails are counted and skipped.
    pub async fn find_leads(
        &self,
        provider: &dyn NewsProvider,
        demo_only: bool,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> FindLeadsReport {
        let batch = fetch_news(provider, demo_only, now).await;
        let fetched = batch.articles.len();
        let mut relevant = self.scoring.current().filter_articles(batch.articles, now);
        if let Some(n) = limit {
            relevant.truncate(n);
        }

        let mut leads = Vec::with_capacity(relevant.len());
        let mut errors = Vec::new();
        for scored in &relevant {
            match self.process_article(&scored.article, now).await {
                Ok(lead) => leads.push(lead),
                Err(e) => {
                    tracing::warn!(error = %e, "lead extraction failed");
                    errors.push(format!("{}: {e}", preview(&scored.article.title, 60)));
                }
            }
        }
        leads.sort_by(|a, b| b.lead_score.cmp(&a.lead_score));

        FindLeadsReport {
            fetched,
            relevant: relevant.len(),
            processed: leads.len(),
            failed: errors.len(),
            is_demo: batch.is_demo,
            leads,
            errors,
        }
    }
}

/// Parse a raw completion into a validated lead.
pub fn parse_completion(raw: &str) -> Result<StructuredLead, PipelineError> {
    match extract_json_object(raw) {
        Ok(v) => Ok(StructuredLead::from_value(&v)),
        Err(source) => {
            counter!("lead_parse_errors_total").increment(1);
            let raw_preview = preview(raw, PREVIEW_CHARS);
            tracing::warn!(error = %source, raw = %raw_preview, "failed to parse LLM response");
            Err(PipelineError::Parse {
                source,
                raw_preview,
            })
        }
    }
}
