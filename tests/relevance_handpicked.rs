// tests/relevance_handpicked.rs
// Hand-picked cases for the relevance filter.
// Self-contained: they use an inline TOML keyword config and a fixed reference time.

use chrono::{DateTime, TimeZone, Utc};
use lead_intel::config::ScoringConfig;
use lead_intel::relevance::RelevanceEngine;
use lead_intel::{Article, ScoringEngine};

const TEST_TOML: &str = r#"
[relevance]
min_score = 40

[keywords]
products = ["Furnace Oil", "diesel", "bitumen", "marine fuel", "HSD"]
equipment = ["boiler", "furnace", "kiln", "genset", "vessel", "port"]
high_intent = ["tender", "procurement", "RFP"]
medium_intent = ["expansion", "new plant"]
exclusions = ["stock price", "cricket"]
"#;

fn engine() -> RelevanceEngine {
    ScoringConfig::from_toml_str(TEST_TOML)
        .expect("parse inline TOML")
        .relevance_engine()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn at(days_ago: i64) -> String {
    (now() - chrono::Duration::days(days_ago)).to_rfc3339()
}

#[test]
fn boiler_tender_example_scores_50() {
    let a = Article::new("New boiler tender at steel plant in Maharashtra", "").with_pub_date(at(0));
    // equipment 10 + high intent 30 + freshness 10
    assert_eq!(engine().calculate_relevance_score(&a, now()), 50);
    // the shipped keyword tables give the same answer
    assert_eq!(
        ScoringEngine::builtin().calculate_relevance_score(&a, now()),
        50
    );
}

#[test]
fn exclusion_wins_over_everything() {
    let a = Article::new(
        "Furnace oil diesel bitumen boiler kiln tender",
        "Refinery stock price jumps",
    )
    .with_pub_date(at(0));
    let rel = engine().score(&a, now());
    assert_eq!(rel.score, 0);
    assert_eq!(rel.reasons, vec!["excluded:stock price".to_string()]);
}

#[test]
fn product_and_equipment_components_cap_at_30() {
    let a = Article::new(
        "Furnace oil, diesel, bitumen and marine fuel for boiler, furnace, kiln, genset",
        "",
    );
    let rel = engine().score(&a, now());
    assert_eq!(rel.breakdown.product, 30);
    assert_eq!(rel.breakdown.equipment, 30);
    // no intent; missing date → 5
    assert_eq!(rel.score, 65);
}

#[test]
fn high_intent_does_not_stack_with_medium() {
    let a = Article::new("Expansion: tender for new plant", "");
    let rel = engine().score(&a, now());
    assert_eq!(rel.breakdown.intent, 30);
    let b = Article::new("Expansion of new plant", "");
    assert_eq!(engine().score(&b, now()).breakdown.intent, 20);
}

#[test]
fn uppercase_keywords_match_after_normalization() {
    let a = Article::new("Issues RFP for HSD supply", "");
    let rel = engine().score(&a, now());
    assert_eq!(rel.breakdown.product, 15);
    assert_eq!(rel.breakdown.intent, 30);
}

#[test]
fn freshness_buckets() {
    let e = engine();
    let fresh = |d: i64| {
        e.score(&Article::new("x", "").with_pub_date(at(d)), now())
            .breakdown
            .freshness
    };
    assert_eq!(fresh(0), 10);
    assert_eq!(fresh(1), 10);
    assert_eq!(fresh(2), 7);
    assert_eq!(fresh(3), 7);
    assert_eq!(fresh(5), 5);
    assert_eq!(fresh(7), 5);
    assert_eq!(fresh(8), 0);
    // future dates are "fresh"
    assert_eq!(fresh(-3), 10);

    let missing = e.score(&Article::new("x", ""), now());
    assert_eq!(missing.breakdown.freshness, 5);
    let garbage = e.score(&Article::new("x", "").with_pub_date("not a date"), now());
    assert_eq!(garbage.breakdown.freshness, 0);
}

#[test]
fn filter_keeps_threshold_and_sorts_stably() {
    let articles = vec![
        Article::new("Kiln tender", "").with_pub_date(at(0)).with_source("a"), // 10+30+10 = 50
        Article::new("cricket boiler tender", "").with_pub_date(at(0)),         // 0
        Article::new("Boiler tender", "").with_pub_date(at(0)).with_source("b"), // 50
        Article::new("Furnace oil boiler tender", "").with_pub_date(at(0)),    // 15+20+30+10 = 75
        Article::new("Genset", "").with_pub_date(at(10)),                       // 10
    ];
    let out = engine().filter_articles(articles, now());
    let scores: Vec<u8> = out.iter().map(|s| s.relevance_score).collect();
    assert_eq!(scores, vec![75, 50, 50]);
    // ties keep input order
    assert_eq!(out[1].article.source_name, "a");
    assert_eq!(out[2].article.source_name, "b");
}

#[test]
fn min_score_is_configurable() {
    let cfg = ScoringConfig::from_toml_str(&TEST_TOML.replace("min_score = 40", "min_score = 60"))
        .unwrap();
    let e = cfg.relevance_engine();
    let out = e.filter_articles(
        vec![Article::new("Boiler tender", "").with_pub_date(at(0))],
        now(),
    );
    assert!(out.is_empty());
}

#[test]
fn empty_and_garbage_articles_score_in_range() {
    let e = engine();
    let a: Article = serde_json::from_str(r#"{"title": 42, "description": ["x"], "pubDate": {}}"#).unwrap();
    let s = e.calculate_relevance_score(&a, now());
    assert!(s <= 100);
    assert_eq!(e.calculate_relevance_score(&Article::default(), now()), 5);
}
