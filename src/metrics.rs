use axum::{routing::get, Router};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::decision::ScoreResult;
use crate::engine::RuleOutcome;

// One global recorder per process; routers built later share it.
static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install (once) the Prometheus recorder and return a handle to it.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| PrometheusBuilder::new().install_recorder())?
            .clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
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

/// Record one finished evaluation. No-op when no recorder is installed.
pub fn record_score(result: &ScoreResult) {
    counter!("pitchdeck_scores_total", "verdict" => result.verdict.as_str()).increment(1);
    histogram!("pitchdeck_score").record(f64::from(result.score));
}

pub fn record_rules(outcomes: &[RuleOutcome]) {
    for o in outcomes.iter().filter(|o| o.fired) {
        counter!("pitchdeck_rules_fired_total", "rule" => o.rule).increment(1);
    }
}

pub fn record_analyze_error() {
    counter!("pitchdeck_analyze_errors_total").increment(1);
}
