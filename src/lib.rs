// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod decision;
pub mod engine;
pub mod extract;
pub mod metrics;
pub mod normalize;
pub mod record;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::decision::{ScoreResult, Verdict};
pub use crate::engine::score;
pub use crate::normalize::{normalize, ScalarValue};
pub use crate::record::MetricsRecord;

use crate::api::AppState;
use crate::config::ServiceConfig;

/// Build the full application router the way the binary does
/// (config file + env overrides, optional metrics/debug routes).
pub async fn app() -> anyhow::Result<axum::Router> {
    let config = ServiceConfig::load();
    let state = AppState::new(config)?;
    Ok(api::router(state))
}
