//! News analytics service — binary entrypoint.
//! Loads config, initialises tracing and metrics, and serves the axum router.

use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use news_analytics::api::{self, AppState};
use news_analytics::config::AnalyticsConfig;
use news_analytics::metrics::Metrics;

const DEFAULT_LOG_FILTER: &str = "news_analytics=info,warn";
const ENV_LOG_JSON: &str = "NEWS_ANALYTICS_LOG_JSON";

/// `RUST_LOG` filter (or the default), compact or JSON lines (`NEWS_ANALYTICS_LOG_JSON=1`).
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(ENV_LOG_JSON).ok().is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

/// Periodically drop expired session indices.
fn spawn_session_janitor(state: AppState, ttl_secs: u64) {
    let period = Duration::from_secs(ttl_secs.clamp(10, 300));
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(period);
        loop {
            tick.tick().await;
            let purged = state.sessions().purge_expired();
            if purged > 0 {
                debug!(purged, "expired sessions dropped");
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AnalyticsConfig::load().context("loading analytics config")?;
    let metrics = Metrics::init(cfg.keywords.limit, cfg.session.ttl_secs)?;

    let state = AppState::from_config(&cfg)?;
    spawn_session_janitor(state.clone(), cfg.session.ttl_secs);
    let app = api::router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("binding {}", cfg.server.bind))?;
    info!(
        bind = %cfg.server.bind,
        data_dir = %cfg.data.dir.display(),
        "news analytics listening"
    );

    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
