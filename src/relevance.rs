// src/relevance.rs
//! Relevance filter: cheap keyword scoring of raw news articles before the
//! expensive LLM extraction step.
//!
//! Score components (sum, clamped to 100):
//! - exclusions: any hit returns 0 immediately
//! - products:   15 per distinct keyword, capped at 30
//! - equipment:  10 per distinct keyword, capped at 30
//! - intent:     30 for any high-intent keyword, else 20 for any medium-intent keyword
//! - freshness:  10 (<=1 day), 7 (<=3), 5 (<=7), 0 older or unparseable, 5 with no date

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::article::{Article, ScoredArticle};
use crate::freshness::{self, Age};

pub const DEFAULT_MIN_SCORE: u8 = 40;
pub const MAX_SCORE: u8 = 100;

const PRODUCT_POINTS: u32 = 15;
const PRODUCT_CAP: u32 = 30;
const EQUIPMENT_POINTS: u32 = 10;
const EQUIPMENT_CAP: u32 = 30;
const HIGH_INTENT_POINTS: u32 = 30;
const MEDIUM_INTENT_POINTS: u32 = 20;

// Dev logging gate: RELEVANCE_DEV_LOG=1 AND dev env (debug or SHUTTLE_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("RELEVANCE_DEV_LOG").ok().as_deref() == Some("1");
    on && crate::is_dev_env()
}

pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Minimal, anonymized dev logger for relevance events.
fn dev_log_relevance(event: &str, text: &str, rel: &Relevance, min_score: u8) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(text);
    let matched_short = truncate_vec(&rel.matched, 5);
    // Never log raw text. Only hashed id + short lists.
    info!(
        target: "relevance",
        %id, score = rel.score, min_score, event,
        matched = ?matched_short,
        reasons = ?rel.reasons
    );
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

/// The five keyword lists. Normalize before use (see [`KeywordTiers::normalized`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordTiers {
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub high_intent: Vec<String>,
    #[serde(default)]
    pub medium_intent: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl KeywordTiers {
    /// Trim, lowercase, drop empties and duplicates (first occurrence wins).
    /// An empty keyword would match every text, so it must never survive.
    pub fn normalized(self) -> Self {
        Self {
            products: clean_list(self.products),
            equipment: clean_list(self.equipment),
            high_intent: clean_list(self.high_intent),
            medium_intent: clean_list(self.medium_intent),
            exclusions: clean_list(self.exclusions),
        }
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

/* ----------------------------
Result type
---------------------------- */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelevanceBreakdown {
    pub product: u8,
    pub equipment: u8,
    pub intent: u8,
    pub freshness: u8,
}

/// Result of relevance evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Relevance {
    pub score: u8,
    pub breakdown: RelevanceBreakdown,
    pub matched: Vec<String>,
    pub reasons: Vec<String>,
}

/* ----------------------------
Engine
---------------------------- */

#[derive(Debug, Clone)]
pub struct RelevanceEngine {
    keywords: KeywordTiers,
    min_score: u8,
}

impl Default for RelevanceEngine {
    fn default() -> Self {
        Self::new(KeywordTiers::default(), DEFAULT_MIN_SCORE)
    }
}

impl RelevanceEngine {
    pub fn new(keywords: KeywordTiers, min_score: u8) -> Self {
        Self {
            keywords: keywords.normalized(),
            min_score: min_score.min(MAX_SCORE),
        }
    }

    pub fn keywords(&self) -> &KeywordTiers {
        &self.keywords
    }

    pub fn min_score(&self) -> u8 {
        self.min_score
    }

    /// Full evaluation with per-component breakdown, matched keywords and reasons.
    pub fn score(&self, article: &Article, now: DateTime<Utc>) -> Relevance {
        let text = article.text_blob();
        let mut rel = Relevance::default();

        // 1) Exclusions first: instant reject
        if let Some(hit) = self.keywords.exclusions.iter().find(|k| text.contains(k.as_str())) {
            rel.reasons.push(format!("excluded:{hit}"));
            counter!("relevance_excluded_total").increment(1);
            dev_log_relevance("excluded", &text, &rel, self.min_score);
            return rel;
        }

        // 2) Products + equipment (distinct keyword hits, capped)
        let products = hits(&self.keywords.products, &text);
        let equipment = hits(&self.keywords.equipment, &text);
        rel.breakdown.product = capped(products.len(), PRODUCT_POINTS, PRODUCT_CAP);
        rel.breakdown.equipment = capped(equipment.len(), EQUIPMENT_POINTS, EQUIPMENT_CAP);
        rel.matched.extend(products.iter().map(|k| format!("product:{k}")));
        rel.matched.extend(equipment.iter().map(|k| format!("equipment:{k}")));

        // 3) Intent: high beats medium, no stacking
        if let Some(k) = first_hit(&self.keywords.high_intent, &text) {
            rel.breakdown.intent = HIGH_INTENT_POINTS as u8;
            rel.matched.push(format!("intent_high:{k}"));
        } else if let Some(k) = first_hit(&self.keywords.medium_intent, &text) {
            rel.breakdown.intent = MEDIUM_INTENT_POINTS as u8;
            rel.matched.push(format!("intent_medium:{k}"));
        }

        // 4) Freshness
        let age = freshness::age(article.pub_date.as_deref(), now);
        rel.breakdown.freshness = freshness_points(age);
        rel.reasons.push(match age {
            Age::Missing => "freshness:no_date".to_string(),
            Age::Unparseable => "freshness:bad_date".to_string(),
            Age::Days(d) => format!("freshness:{d:.1}d"),
        });

        // 5) Clamp
        let b = rel.breakdown;
        let total = b.product as u32 + b.equipment as u32 + b.intent as u32 + b.freshness as u32;
        rel.score = total.min(MAX_SCORE as u32) as u8;

        let event = if rel.score >= self.min_score {
            "kept"
        } else {
            "below_min"
        };
        dev_log_relevance(event, &text, &rel, self.min_score);
        rel
    }

    /// Score in [0, 100] for one article.
    pub fn calculate_relevance_score(&self, article: &Article, now: DateTime<Utc>) -> u8 {
        self.score(article, now).score
    }

    /// Score every article, keep those at or above `min_score`, and sort by score
    /// descending. The sort is stable: ties keep their input order.
    pub fn filter_articles<I>(&self, articles: I, now: DateTime<Utc>) -> Vec<ScoredArticle>
    where
        I: IntoIterator<Item = Article>,
    {
        let mut scored_total = 0u64;
        let mut kept: Vec<ScoredArticle> = articles
            .into_iter()
            .map(|article| {
                scored_total += 1;
                let relevance_score = self.calculate_relevance_score(&article, now);
                ScoredArticle {
                    article,
                    relevance_score,
                }
            })
            .filter(|s| s.relevance_score >= self.min_score)
            .collect();
        kept.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

        counter!("relevance_scored_total").increment(scored_total);
        counter!("relevance_kept_total").increment(kept.len() as u64);
        kept
    }
}

fn hits<'a>(keywords: &'a [String], text: &str) -> Vec<&'a str> {
    keywords
        .iter()
        .filter(|k| text.contains(k.as_str()))
        .map(String::as_str)
        .collect()
}

fn first_hit<'a>(keywords: &'a [String], text: &str) -> Option<&'a str> {
    keywords
        .iter()
        .find(|k| text.contains(k.as_str()))
        .map(String::as_str)
}

fn capped(count: usize, per_hit: u32, cap: u32) -> u8 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count.saturating_mul(per_hit).min(cap) as u8
}

fn freshness_points(age: Age) -> u8 {
    match age {
        Age::Missing => 5,
        Age::Unparseable => 0,
        Age::Days(d) if d <= 1.0 => 10,
        Age::Days(d) if d <= 3.0 => 7,
        Age::Days(d) if d <= 7.0 => 5,
        Age::Days(_) => 0,
    }
}

/* ----------------------------
Tests
---------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn tiers() -> KeywordTiers {
        KeywordTiers {
            products: vec!["Furnace Oil".into(), "bitumen".into(), "hsd".into()],
            equipment: vec!["boiler".into(), "kiln".into(), "genset".into(), "port".into()],
            high_intent: vec!["tender".into(), "RFP".into()],
            medium_intent: vec!["expansion".into(), "plans to".into()],
            exclusions: vec!["cricket".into(), "stock price".into()],
        }
    }

    fn eng() -> RelevanceEngine {
        RelevanceEngine::new(tiers(), DEFAULT_MIN_SCORE)
    }

    fn dated(title: &str, days_old: i64) -> Article {
        Article::new(title, "").with_pub_date((now() - Duration::days(days_old)).to_rfc3339())
    }

    #[test]
    fn normalization_lowercases_and_drops_blanks() {
        let t = KeywordTiers {
            products: vec![" HSD ".into(), "hsd".into(), "".into(), "  ".into()],
            ..Default::default()
        }
        .normalized();
        assert_eq!(t.products, vec!["hsd"]);
    }

    #[test]
    fn uppercase_config_keywords_still_match() {
        let r = eng().score(&dated("RFP issued for furnace oil", 0), now());
        assert_eq!(r.breakdown.intent, 30);
        assert_eq!(r.breakdown.product, 15);
    }

    #[test]
    fn exclusion_short_circuits() {
        let r = eng().score(&dated("Boiler tender near cricket ground", 0), now());
        assert_eq!(r.score, 0);
        assert_eq!(r.breakdown, RelevanceBreakdown::default());
        assert!(r.reasons.iter().any(|s| s == "excluded:cricket"));
        assert!(r.matched.is_empty());
    }

    #[test]
    fn component_caps_apply() {
        let a = dated(
            "furnace oil, bitumen and hsd for boiler, kiln, genset at port: tender",
            0,
        );
        let r = eng().score(&a, now());
        assert_eq!(r.breakdown.product, 30);
        assert_eq!(r.breakdown.equipment, 30);
        assert_eq!(r.breakdown.intent, 30);
        assert_eq!(r.breakdown.freshness, 10);
        assert_eq!(r.score, 100);
    }

    #[test]
    fn high_intent_beats_medium() {
        let r = eng().score(&dated("expansion tender", 30), now());
        assert_eq!(r.breakdown.intent, 30);
        let r = eng().score(&dated("company plans to grow", 30), now());
        assert_eq!(r.breakdown.intent, 20);
    }

    #[test]
    fn freshness_buckets() {
        assert_eq!(freshness_points(Age::Days(-2.0)), 10);
        assert_eq!(freshness_points(Age::Days(1.0)), 10);
        assert_eq!(freshness_points(Age::Days(1.01)), 7);
        assert_eq!(freshness_points(Age::Days(3.0)), 7);
        assert_eq!(freshness_points(Age::Days(7.0)), 5);
        assert_eq!(freshness_points(Age::Days(7.5)), 0);
        assert_eq!(freshness_points(Age::Missing), 5);
        assert_eq!(freshness_points(Age::Unparseable), 0);
    }

    #[test]
    fn filter_keeps_threshold_and_is_stable() {
        let arts = vec![
            dated("first boiler tender", 0),   // 10 + 30 + 10 = 50
            dated("nothing relevant", 0),      // 10
            dated("second kiln tender", 0),    // 50
            dated("hsd boiler tender", 0),     // 15 + 10 + 30 + 10 = 65
            dated("exactly forty: tender", 0), // 30 + 10 = 40
        ];
        let out = eng().filter_articles(arts, now());
        let titles: Vec<_> = out.iter().map(|s| s.article.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "hsd boiler tender",
                "first boiler tender",
                "second kiln tender",
                "exactly forty: tender"
            ]
        );
        assert_eq!(out.last().unwrap().relevance_score, 40);
    }

    #[test]
    fn anon_hash_is_short_hex() {
        let h = anon_hash("some article text");
        assert_eq!(h.len(), 12);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
