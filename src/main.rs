//! Lead Intelligence Service: binary entrypoint.
//! Boots the Axum HTTP server: scoring config, collaborators, routes, metrics.

use anyhow::Context;
use lead_intel::config::ScoringConfig;
use lead_intel::engine::{start_hot_reload_thread, ScoringEngine, ScoringHandle};
use lead_intel::metrics::Metrics;
use lead_intel::{is_dev_env, router, AppState};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - LEAD_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("LEAD_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    if !(dev_flag && is_dev_env()) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lead_intel=info,relevance=info,warn"));

    // Shuttle may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // --- Scoring rules ---
    let cfg = ScoringConfig::load().context("loading scoring config")?;
    let handle = ScoringHandle::new(ScoringEngine::from_config(&cfg));
    start_hot_reload_thread(handle.clone(), ScoringConfig::config_path());

    let metrics = Metrics::init(cfg.relevance.min_score).context("installing metrics recorder")?;

    let state = AppState::from_env(handle);
    tracing::info!(
        llm = state.pipeline.llm().provider_name(),
        telegram = state.telegram.is_configured(),
        "lead intelligence service starting"
    );

    let app = metrics.router().merge(router(state));
    Ok(app.into())
}
