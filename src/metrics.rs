use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish static config gauges.
    pub fn init(keyword_limit: usize, session_ttl_secs: u64) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("api_requests_total", "HTTP API requests by route.");
        describe_counter!("api_load_errors_total", "Document loads that failed inside a request.");
        describe_gauge!("analytics_sessions", "Sessions with a cached keyword index.");

        gauge!("analytics_keyword_limit").set(keyword_limit as f64);
        gauge!("analytics_session_ttl_secs").set(session_ttl_secs as f64);

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
