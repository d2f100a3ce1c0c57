//! Tracing setup and log-safe identifiers.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "PITCHDECK_DEV_LOG";

/// Dev logging gate: PITCHDECK_DEV_LOG=1 AND dev env (debug build or SHUTTLE_ENV in {local,development,dev}).
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Install a compact subscriber in development. No-op in production, where
/// Shuttle owns the global subscriber.
pub fn init_dev_tracing() {
    if !dev_logging_enabled() {
        return;
    }
    init_tracing("scoring=info,pitchdeck_analyzer=info,warn");
}

/// Install a compact fmt subscriber on stderr, `RUST_LOG` taking precedence over
/// `default_filter`. Ignores the error when a subscriber is already set.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

/// Short stable id for a payload (first 6 bytes of SHA-256, hex). Deck data is
/// confidential, so logs carry this instead of content.
pub fn anon_id(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
