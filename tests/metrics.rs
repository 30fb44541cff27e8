// tests/metrics.rs
use axum::body::{self, Body};
use http::{Request, StatusCode};
use chrono::Utc;
use tower::ServiceExt;

use lead_intel::metrics::Metrics;
use lead_intel::{Article, ScoringEngine};

#[tokio::test]
async fn metrics_endpoint_exposes_relevance_series() {
    // One recorder per process; this file holds the only test that installs it.
    let metrics = Metrics::init(40).expect("install recorder");

    let now = Utc::now();
    let kept = ScoringEngine::builtin().filter_articles(
        vec![
            Article::new("Boiler tender at cement plant", "").with_pub_date(now.to_rfc3339()),
            Article::new("Cricket league boiler tender", ""),
        ],
        now,
    );
    assert_eq!(kept.len(), 1);
    // recorded through the same facade the exporter was installed into
    assert!(metrics.handle.render().contains("relevance_kept_total 1"));

    let resp = metrics
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    for needle in [
        "relevance_scored_total",
        "relevance_kept_total",
        "relevance_excluded_total",
        "relevance_min_score 40",
        "# HELP relevance_scored_total Articles scored by the relevance filter.",
    ] {
        assert!(text.contains(needle), "missing {needle} in:\n{text}");
    }
}
