//! Shared domain types and configuration for dscout.
//!
//! The common record schema ([`DemandRecord`]) and the run configuration
//! ([`SearchRequest`], [`AppConfig`]) live here so that the source adapters,
//! the batch runner, and the exporter all agree on one shape without
//! depending on each other.

mod app_config;
mod config;
mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    default_keywords, DemandRecord, DemandSignal, Platform, SearchRequest, UnknownPlatform,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
