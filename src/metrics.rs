use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the active relevance threshold.
    pub fn init(min_score: u8) -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new().install_recorder()?;

        // relevance filter
        describe_counter!("relevance_scored_total", "Articles scored by the relevance filter.");
        describe_counter!("relevance_kept_total", "Articles at or above the relevance threshold.");
        describe_counter!("relevance_excluded_total", "Articles rejected by an exclusion keyword.");
        describe_gauge!("relevance_min_score", "Active relevance threshold.");

        // lead pipeline
        describe_counter!("leads_processed_total", "Articles turned into scored leads.");
        describe_counter!("lead_parse_errors_total", "LLM completions without usable JSON.");
        describe_histogram!("lead_score", "Distribution of lead scores (0..100).");
        describe_counter!("llm_errors_total", "Failed LLM completions.");

        // news
        describe_counter!("news_articles_total", "Articles returned by the live news provider.");
        describe_counter!(
            "news_fallback_total",
            "Fetches answered with the demo set instead of live news."
        );
        describe_histogram!("news_fetch_ms", "Live news fetch time in milliseconds.");

        // alerts
        describe_counter!("alerts_sent_total", "Telegram alerts delivered.");
        describe_counter!("alerts_failed_total", "Telegram alerts that failed.");

        gauge!("relevance_min_score").set(min_score as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
