//! Runs the relevance filter over the demo articles (or a JSON file of articles)
//! and prints each kept article with its score. No network, no LLM.
//!
//! Usage: `cargo run --bin score_demo [articles.json]`

use anyhow::Context;
use chrono::Utc;
use lead_intel::config::ScoringConfig;
use lead_intel::ingest::providers::demo_articles;
use lead_intel::{Article, ScoringEngine};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let now = Utc::now();

    let articles: Vec<Article> = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?
        }
        None => demo_articles(now),
    };

    let engine = ScoringEngine::from_config(&ScoringConfig::load()?);
    let total = articles.len();
    for a in &articles {
        let rel = engine.relevance(a, now);
        tracing::info!(score = rel.score, matched = ?rel.matched, title = %a.title, "scored");
    }

    let kept = engine.filter_articles(articles, now);
    for s in &kept {
        println!("{:>3}  {}", s.relevance_score, s.article.title);
    }
    println!(
        "score-demo done: kept {}/{} (min score {})",
        kept.len(),
        total,
        engine.relevance.min_score()
    );
    Ok(())
}
