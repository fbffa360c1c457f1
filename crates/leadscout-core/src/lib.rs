//! Shared types and configuration for the leadscout workspace.

pub mod app_config;
pub mod config;
pub mod error;
pub mod profile;
pub mod run_config;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use profile::{ProfileRecord, ScoreCard, ScoredProfile};
pub use run_config::{load_run_config, parse_run_config, RunConfig, DEFAULT_QUERIES};
