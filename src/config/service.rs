// src/config/service.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};
use tracing::{info, warn};

pub const DEFAULT_SERVICE_CONFIG_PATH: &str = "config/service.toml";

pub const ENV_SERVICE_CONFIG_PATH: &str = "PITCHDECK_CONFIG_PATH";
pub const ENV_MAX_BODY_BYTES: &str = "PITCHDECK_MAX_BODY_BYTES";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";
pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";

fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Largest accepted request body. Extractions are small; this mostly guards `/analyze`.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Allow any origin (browser upload UIs live on other hosts).
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
    /// Expose `/metrics` in Prometheus format.
    #[serde(default)]
    pub metrics_enabled: bool,
    /// Expose `/debug/trace`.
    #[serde(default)]
    pub debug_routes: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            cors_permissive: true,
            metrics_enabled: false,
            debug_routes: false,
        }
    }
}

impl ServiceConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading service config from {}", path.display()))?;
        let mut cfg: ServiceConfig = toml::from_str(&data)
            .with_context(|| format!("parsing service config {}", path.display()))?;

        // A zero limit would reject every request.
        if cfg.max_body_bytes == 0 {
            cfg.max_body_bytes = default_max_body_bytes();
        }
        Ok(cfg)
    }

    /// Resolve config the way the binary does:
    /// 1) $PITCHDECK_CONFIG_PATH or config/service.toml (missing file → defaults)
    /// 2) env overrides on top
    ///
    /// Never fails; a broken file is logged and replaced by defaults.
    pub fn load() -> Self {
        let path = env::var(ENV_SERVICE_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SERVICE_CONFIG_PATH));

        let mut cfg = if path.exists() {
            match Self::load_from_file(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = ?e, "service config invalid, using defaults");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };
        cfg.apply_env_overrides();

        info!(
            max_body_bytes = cfg.max_body_bytes,
            cors_permissive = cfg.cors_permissive,
            metrics_enabled = cfg.metrics_enabled,
            debug_routes = cfg.debug_routes,
            "service config loaded"
        );
        cfg
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(n) = env::var(ENV_MAX_BODY_BYTES)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
        {
            self.max_body_bytes = n;
        }
        if let Some(b) = env_flag(ENV_METRICS_ENABLED) {
            self.metrics_enabled = b;
        }
        if let Some(b) = env_flag(ENV_DEBUG_ROUTES) {
            self.debug_routes = b;
        }
    }
}

// "1"/"true"/"yes"/"on" → Some(true); "0"/"false"/"no"/"off" → Some(false); else None.
fn env_flag(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("service.toml");
        fs::write(&p, "metrics_enabled = true\n").unwrap();

        let cfg = ServiceConfig::load_from_file(&p).unwrap();
        assert!(cfg.metrics_enabled);
        assert!(cfg.cors_permissive);
        assert!(!cfg.debug_routes);
        assert_eq!(cfg.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn zero_body_limit_is_reset() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("service.toml");
        fs::write(&p, "max_body_bytes = 0\n").unwrap();
        let cfg = ServiceConfig::load_from_file(&p).unwrap();
        assert_eq!(cfg.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("service.toml");
        fs::write(&p, "max_body_bytes = \"lots\"\n").unwrap();
        assert!(ServiceConfig::load_from_file(&p).is_err());
        assert!(ServiceConfig::load_from_file(tmp.path().join("missing.toml")).is_err());
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_win_over_file() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("service.toml");
        fs::write(&p, "max_body_bytes = 2048\ndebug_routes = false\n").unwrap();

        env::set_var(ENV_SERVICE_CONFIG_PATH, p.display().to_string());
        env::set_var(ENV_DEBUG_ROUTES, "1");
        env::set_var(ENV_MAX_BODY_BYTES, "not-a-number");
        env::remove_var(ENV_METRICS_ENABLED);

        let cfg = ServiceConfig::load();
        assert!(cfg.debug_routes);
        assert_eq!(cfg.max_body_bytes, 2048);
        assert!(!cfg.metrics_enabled);

        env::remove_var(ENV_SERVICE_CONFIG_PATH);
        env::remove_var(ENV_DEBUG_ROUTES);
        env::remove_var(ENV_MAX_BODY_BYTES);
    }
}
