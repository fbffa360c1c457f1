//! Plain HTTP page fetcher.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use leadscout_core::AppConfig;

use super::{FetchedPage, PageContent, PageFetcher};
use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

/// Fetches raw HTML over HTTP with browser-like headers, an optional proxy,
/// and retry on transient failures.
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with configured timeout, `User-Agent`, proxy,
    /// and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidProxy`] if `proxy_url` does not parse and
    /// [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        proxy_url: Option<&str>,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent);

        if let Some(proxy_url) = proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ScraperError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Build from the process configuration.
    ///
    /// # Errors
    ///
    /// See [`HttpFetcher::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.proxy_url.as_deref(),
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(30);
            return Err(ScraperError::RateLimited {
                url: url.to_owned(),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let loaded_url = response.url().to_string();
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ScraperError::EmptyBody {
                url: url.to_owned(),
            });
        }

        Ok(FetchedPage {
            requested_url: url.to_owned(),
            loaded_url,
            content: PageContent::Static(body),
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, ScraperError>> + Send {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, move || {
            self.fetch_once(url)
        })
    }
}
