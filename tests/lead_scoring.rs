// tests/lead_scoring.rs
// Lead scorer: worked example, fallbacks, bounds, monotonicity.

use chrono::{DateTime, Duration, TimeZone, Utc};
use lead_intel::lead::{lead_score_breakdown, IntentLevel, Urgency};
use lead_intel::{calculate_lead_score, Article, LeadTier, ScoringEngine, StructuredLead};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 2, 10, 30, 0).unwrap()
}

fn today() -> Article {
    Article::new("t", "").with_pub_date(now().to_rfc3339())
}

#[test]
fn worked_example_scores_94() {
    let lead = StructuredLead::from_value(&json!({
        "intent_level": "High",
        "product_recommendations": [{ "confidence": 90 }, { "confidence": 70 }],
        "urgency": "Immediate"
    }));
    // 30 + 24 + 20 + 20
    assert_eq!(calculate_lead_score(&lead, &today(), now()), 94);
}

#[test]
fn empty_lead_uses_fallback_buckets() {
    let lead = StructuredLead::default();
    // low intent 10 + no products 0 + long-term 8 + no date 10
    assert_eq!(calculate_lead_score(&lead, &Article::default(), now()), 28);
    let b = lead_score_breakdown(&lead, &Article::default(), now());
    assert_eq!((b.intent, b.urgency, b.freshness), (10, 8, 10));
    assert_eq!(b.product_confidence, 0.0);
}

#[test]
fn unrecognized_categories_score_like_the_lowest() {
    let odd = StructuredLead::from_value(&json!({ "intent_level": "urgent!!", "urgency": "yesterday" }));
    let low = StructuredLead::from_value(&json!({ "intent_level": "Low", "urgency": "Long-term" }));
    assert_eq!(
        calculate_lead_score(&odd, &today(), now()),
        calculate_lead_score(&low, &today(), now())
    );
}

#[test]
fn stale_and_unparseable_dates_get_five() {
    let lead = StructuredLead::default();
    let old = Article::new("t", "").with_pub_date((now() - Duration::days(30)).to_rfc3339());
    let bad = Article::new("t", "").with_pub_date("soon");
    assert_eq!(lead_score_breakdown(&lead, &old, now()).freshness, 5);
    assert_eq!(lead_score_breakdown(&lead, &bad, now()).freshness, 5);
}

#[test]
fn out_of_range_confidence_is_clamped() {
    let lead = StructuredLead::from_value(&json!({
        "intent_level": "High",
        "urgency": "Immediate",
        "product_recommendations": [{ "confidence": 500 }, { "confidence": "-20" }]
    }));
    // mean of 100 and 0 → 15
    assert_eq!(calculate_lead_score(&lead, &today(), now()), 85);
}

#[test]
fn score_is_bounded_for_random_leads() {
    let mut rng = StdRng::seed_from_u64(7);
    let intents = ["High", "Medium", "Low", "", "nope"];
    let urgencies = ["Immediate", "Near-term", "Long-term", "", "asap"];
    for _ in 0..500 {
        let n = rng.random_range(0..4);
        let recs: Vec<_> = (0..n)
            .map(|_| json!({ "product": "FO", "confidence": rng.random_range(-50.0..250.0) }))
            .collect();
        let lead = StructuredLead::from_value(&json!({
            "intent_level": intents[rng.random_range(0..intents.len())],
            "urgency": urgencies[rng.random_range(0..urgencies.len())],
            "product_recommendations": recs
        }));
        let days = rng.random_range(-2..20);
        let art = Article::new("t", "").with_pub_date((now() - Duration::days(days)).to_rfc3339());
        let s = calculate_lead_score(&lead, &art, now());
        assert!(s <= 100);
        assert_eq!(s, calculate_lead_score(&lead, &art, now()), "idempotent");
    }
}

#[test]
fn monotonic_in_each_component() {
    let base = |intent: IntentLevel, urgency: Urgency, conf: f64, days: i64| {
        let lead = StructuredLead::from_value(&json!({
            "intent_level": intent.as_str(),
            "urgency": urgency.as_str(),
            "product_recommendations": [{ "product": "HSD", "confidence": conf }]
        }));
        let art = Article::new("t", "").with_pub_date((now() - Duration::days(days)).to_rfc3339());
        calculate_lead_score(&lead, &art, now())
    };

    let intents = [IntentLevel::Low, IntentLevel::Medium, IntentLevel::High];
    let urgencies = [Urgency::LongTerm, Urgency::NearTerm, Urgency::Immediate];

    for w in intents.windows(2) {
        assert!(base(w[0], Urgency::NearTerm, 50.0, 2) <= base(w[1], Urgency::NearTerm, 50.0, 2));
    }
    for w in urgencies.windows(2) {
        assert!(base(IntentLevel::Medium, w[0], 50.0, 2) <= base(IntentLevel::Medium, w[1], 50.0, 2));
    }
    for c in (0..100).step_by(5) {
        let c = c as f64;
        assert!(base(IntentLevel::Low, Urgency::LongTerm, c, 2) <= base(IntentLevel::Low, Urgency::LongTerm, c + 5.0, 2));
    }
    for d in 0..15 {
        assert!(base(IntentLevel::High, Urgency::Immediate, 80.0, d + 1) <= base(IntentLevel::High, Urgency::Immediate, 80.0, d));
    }
}

#[test]
fn complete_lead_carries_tier_and_snapshot() {
    let lead = StructuredLead::from_value(&json!({
        "company_name": "Tata Steel",
        "industry_sector": "Steel",
        "location": { "city": "Jamshedpur", "state": "Jharkhand" },
        "intent_level": "High",
        "urgency": "Immediate",
        "product_recommendations": [{ "product": "Furnace Oil", "confidence": 85 }]
    }));
    let article = Article::from_value(&json!({
        "title": "Tata Steel expands Jamshedpur plant",
        "pubDate": now().to_rfc3339(),
        "source_id": "et",
        "link": "https://example.test/tata"
    }));
    let done = ScoringEngine::builtin().complete_lead(lead, &article, now());
    assert_eq!(done.lead_score, 96);
    assert_eq!(done.tier, LeadTier::Hot);
    assert_eq!(done.assigned_territory.region, "Eastern");
    assert_eq!(done.source_article.source, "et");
    assert_eq!(done.source_article.url.as_deref(), Some("https://example.test/tata"));

    let v = serde_json::to_value(&done).unwrap();
    assert_eq!(v["company_name"], "Tata Steel");
    assert_eq!(v["lead_score"], 96);
    assert_eq!(v["tier"], "hot");
    assert_eq!(v["urgency"], "Immediate");
    assert_eq!(v["assigned_territory"]["office"], "Kolkata DSRO");
}
