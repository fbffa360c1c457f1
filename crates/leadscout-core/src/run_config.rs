//! Per-run lead policy: search queries, caps, and retention thresholds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Queries used when the run input supplies none.
pub const DEFAULT_QUERIES: [&str; 2] = [
    r#"site:instagram.com ("wholesaling" OR "wholesale real estate") ("coach" OR "mentorship" OR "apply")"#,
    r#"site:instagram.com ("trading" OR "options") ("signals" OR "community" OR "book a call")"#,
];

const DEFAULT_MAX_PROFILES: usize = 50;
const DEFAULT_MIN_FOLLOWERS: u64 = 2000;
const DEFAULT_ACTIVE_WITHIN_DAYS: u32 = 60;
const DEFAULT_OVER_COLLECTION_FACTOR: usize = 5;

/// Tunable knobs for one pipeline run. Immutable once the run starts.
///
/// `min_followers` and `active_within_days` accept an explicit `null` in the
/// input file, which disables that threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,
    #[serde(default = "default_max_profiles", alias = "max_profiles")]
    pub max_profiles: usize,
    #[serde(default = "default_min_followers", alias = "min_followers")]
    pub min_followers: Option<u64>,
    #[serde(default = "default_active_within_days", alias = "active_within_days")]
    pub active_within_days: Option<u32>,
    #[serde(default = "default_true", alias = "require_link_or_email")]
    pub require_link_or_email: bool,
    #[serde(default = "default_true", alias = "use_browser_for_profiles")]
    pub use_browser_for_profiles: bool,
    #[serde(
        default = "default_over_collection_factor",
        alias = "over_collection_factor"
    )]
    pub over_collection_factor: usize,
}

fn default_queries() -> Vec<String> {
    DEFAULT_QUERIES.iter().map(|q| (*q).to_string()).collect()
}

fn default_max_profiles() -> usize {
    DEFAULT_MAX_PROFILES
}

#[allow(clippy::unnecessary_wraps)]
fn default_min_followers() -> Option<u64> {
    Some(DEFAULT_MIN_FOLLOWERS)
}

#[allow(clippy::unnecessary_wraps)]
fn default_active_within_days() -> Option<u32> {
    Some(DEFAULT_ACTIVE_WITHIN_DAYS)
}

fn default_true() -> bool {
    true
}

fn default_over_collection_factor() -> usize {
    DEFAULT_OVER_COLLECTION_FACTOR
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            queries: default_queries(),
            max_profiles: DEFAULT_MAX_PROFILES,
            min_followers: default_min_followers(),
            active_within_days: default_active_within_days(),
            require_link_or_email: true,
            use_browser_for_profiles: true,
            over_collection_factor: DEFAULT_OVER_COLLECTION_FACTOR,
        }
    }
}

impl RunConfig {
    /// Upper bound on candidates carried from discovery into enrichment.
    #[must_use]
    pub fn candidate_limit(&self) -> usize {
        self.max_profiles.saturating_mul(self.over_collection_factor)
    }

    /// Reject configurations that cannot produce a meaningful run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for empty or blank queries, a zero
    /// `max_profiles`, or a zero `over_collection_factor`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queries.is_empty() {
            return Err(ConfigError::Validation(
                "at least one query is required".to_string(),
            ));
        }
        if self.queries.iter().any(|q| q.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "queries must be non-empty strings".to_string(),
            ));
        }
        if self.max_profiles == 0 {
            return Err(ConfigError::Validation(
                "maxProfiles must be at least 1".to_string(),
            ));
        }
        if self.over_collection_factor == 0 {
            return Err(ConfigError::Validation(
                "overCollectionFactor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the run configuration from an optional YAML (or JSON) input file.
///
/// A missing path yields the defaults. The result is not validated: callers
/// layer their overrides first, then call [`RunConfig::validate`].
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_run_config(path: Option<&Path>) -> Result<RunConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::RunFileIo {
                    path: path.display().to_string(),
                    source: e,
                })?;
            parse_run_config(&content)?
        }
        None => RunConfig::default(),
    };
    Ok(config)
}

/// Parse a run configuration document. Empty documents yield the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::RunFileParse`] on malformed input or unknown keys.
pub fn parse_run_config(content: &str) -> Result<RunConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(RunConfig::default());
    }
    serde_yaml::from_str(content).map_err(ConfigError::RunFileParse)
}
