use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;
    use std::str::FromStr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    fn parse_num<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }

    let env = parse_environment(&or_default("LEADSCOUT_ENV", "development"));
    let log_level = or_default("LEADSCOUT_LOG_LEVEL", env.default_log_level());
    let user_agent = or_default("LEADSCOUT_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs: u64 = parse_num(
        "LEADSCOUT_REQUEST_TIMEOUT_SECS",
        &or_default("LEADSCOUT_REQUEST_TIMEOUT_SECS", "30"),
    )?;
    let render_timeout_secs: u64 = parse_num(
        "LEADSCOUT_RENDER_TIMEOUT_SECS",
        &or_default("LEADSCOUT_RENDER_TIMEOUT_SECS", "20"),
    )?;
    let fetch_concurrency: usize = parse_num(
        "LEADSCOUT_FETCH_CONCURRENCY",
        &or_default("LEADSCOUT_FETCH_CONCURRENCY", "4"),
    )?;
    if fetch_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LEADSCOUT_FETCH_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let max_retries: u32 = parse_num(
        "LEADSCOUT_MAX_RETRIES",
        &or_default("LEADSCOUT_MAX_RETRIES", "2"),
    )?;
    let retry_backoff_base_secs: u64 = parse_num(
        "LEADSCOUT_RETRY_BACKOFF_BASE_SECS",
        &or_default("LEADSCOUT_RETRY_BACKOFF_BASE_SECS", "2"),
    )?;

    let proxy_url = optional("LEADSCOUT_PROXY_URL");
    let browserless_url = optional("BROWSERLESS_URL");
    let browserless_token = optional("BROWSERLESS_TOKEN");
    let output_path = PathBuf::from(or_default("LEADSCOUT_OUTPUT_PATH", "./output/leads.json"));

    Ok(AppConfig {
        env,
        log_level,
        user_agent,
        request_timeout_secs,
        render_timeout_secs,
        fetch_concurrency,
        max_retries,
        retry_backoff_base_secs,
        proxy_url,
        browserless_url,
        browserless_token,
        output_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
