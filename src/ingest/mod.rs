// src/ingest/mod.rs
pub mod providers;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::counter;
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::article::Article;
use crate::ingest::providers::{demo_articles, DEMO_TOP_UP};
use crate::ingest::types::NewsProvider;

/// Normalize text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Articles for one dashboard refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsBatch {
    pub total_results: usize,
    pub articles: Vec<Article>,
    /// True when the batch is the demo set only.
    pub is_demo: bool,
}

impl NewsBatch {
    fn demo(now: DateTime<Utc>) -> Self {
        counter!("news_fallback_total").increment(1);
        let articles = demo_articles(now);
        Self {
            total_results: articles.len(),
            articles,
            is_demo: true,
        }
    }
}

/// Fetch live news, falling back to the demo set on error or an empty result.
/// A successful fetch is topped up with the first [`DEMO_TOP_UP`] demo articles.
/// Never fails.
pub async fn fetch_news(
    provider: &dyn NewsProvider,
    demo_only: bool,
    now: DateTime<Utc>,
) -> NewsBatch {

    if demo_only {
        tracing::info!("serving demo articles (forced demo mode)");
        return NewsBatch::demo(now);
    }

    match provider.fetch_latest().await {
        Ok(live) if !live.is_empty() => {
            tracing::info!(provider = provider.name(), count = live.len(), "fetched news");
            let mut articles = live;
            articles.extend(demo_articles(now).into_iter().take(DEMO_TOP_UP));
            NewsBatch {
                total_results: articles.len(),
                articles,
                is_demo: false,
            }
        }
        Ok(_) => {
            tracing::info!(provider = provider.name(), "no live results, serving demo articles");
            NewsBatch::demo(now)
        }
        Err(e) => {
            tracing::warn!(error = ?e, provider = provider.name(), "news fetch failed, serving demo articles");
            NewsBatch::demo(now)
        }
    }
}
