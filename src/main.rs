//! Pitch Deck Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server that scores extracted pitch-deck metrics.

use shuttle_axum::ShuttleAxum;
use tracing::info;

use pitchdeck_analyzer::telemetry::init_dev_tracing;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    init_dev_tracing();

    let router = pitchdeck_analyzer::app()
        .await
        .map_err(shuttle_runtime::Error::Custom)?;
    info!("pitchdeck analyzer router ready");

    Ok(router.into())
}
