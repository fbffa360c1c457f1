use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Environment {
    /// Log filter used when `LEADSCOUT_LOG_LEVEL` is unset.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Test => "warn",
            Environment::Production => "info",
        }
    }
}

/// Process-level settings read from the environment.
///
/// Everything that shapes *how* pages are fetched and where results land
/// lives here; the per-run lead policy lives in [`crate::RunConfig`].
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub render_timeout_secs: u64,
    pub fetch_concurrency: usize,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub proxy_url: Option<String>,
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
    pub output_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("render_timeout_secs", &self.render_timeout_secs)
            .field("fetch_concurrency", &self.fetch_concurrency)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("proxy_url", &self.proxy_url.as_ref().map(|_| "[redacted]"))
            .field("browserless_url", &self.browserless_url)
            .field(
                "browserless_token",
                &self.browserless_token.as_ref().map(|_| "[redacted]"),
            )
            .field("output_path", &self.output_path)
            .finish()
    }
}
