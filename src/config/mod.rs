// src/config/mod.rs
//! Service configuration (TOML file + env overrides).

pub mod service;

pub use service::ServiceConfig;
