// src/ingest/providers/newsdata.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::article::Article;
use crate::ingest::normalize_text;
use crate::ingest::types::NewsProvider;

pub const ENV_NEWSDATA_API_KEY: &str = "NEWSDATA_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1/latest";
/// Industrial fuel-demand query: plants that burn fuel, minus market noise.
pub const QUERY: &str =
    "(plant OR factory OR refinery) AND (fuel OR power OR bunker) NOT (stock OR lounge OR merger)";

#[derive(Debug, Deserialize)]
struct NewsDataResp {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// NewsData.io "latest" endpoint: Indian English business news, deduplicated, 10 per call.
pub struct NewsDataProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsDataProvider {
    pub fn new(api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(ENV_NEWSDATA_API_KEY).ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Turn the raw `results` array into articles with cleaned text.
pub(crate) fn parse_results(results: Vec<Value>) -> Vec<Article> {
    results
        .iter()
        .map(Article::from_value)
        .map(|mut a| {
            a.title = normalize_text(&a.title);
            a.description = normalize_text(&a.description);
            a
        })
        .filter(|a| !a.title.is_empty() || !a.description.is_empty())
        .collect()
}

#[async_trait]
impl NewsProvider for NewsDataProvider {
    async fn fetch_latest(&self) -> Result<Vec<Article>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("{ENV_NEWSDATA_API_KEY} not set"))?;
        let t0 = std::time::Instant::now();

        let resp: NewsDataResp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("apikey", key),
                ("q", QUERY),
                ("country", "in"),
                ("language", "en"),
                ("category", "business"),
                ("removeduplicate", "1"),
                ("size", "10"),
            ])
            .send()
            .await
            .context("requesting newsdata")?
            .json()
            .await
            .context("decoding newsdata response")?;

        if resp.status == "error" {
            return Err(anyhow!("newsdata returned status=error"));
        }
        let out = parse_results(resp.results.unwrap_or_default());

        histogram!("news_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("news_articles_total").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "newsdata"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_results_cleans_and_maps_fields() {
        let out = parse_results(vec![
            json!({
                "title": "  New <b>boiler</b>&amp; kiln ",
                "description": null,
                "pubDate": "2025-01-02 10:00:00",
                "source_id": "moneycontrol",
                "link": "https://x.test/a"
            }),
            json!({ "title": "", "description": "  " }),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "New boiler& kiln");
        assert_eq!(out[0].source_name, "moneycontrol");
        assert_eq!(out[0].pub_date.as_deref(), Some("2025-01-02 10:00:00"));
    }

    #[tokio::test]
    async fn missing_key_is_an_error() {
        let p = NewsDataProvider::new(Some("  ".into()));
        assert!(!p.has_key());
        let err = p.fetch_latest().await.unwrap_err();
        assert!(err.to_string().contains(ENV_NEWSDATA_API_KEY));
    }
}
