//! Rendered-page fetcher backed by a Browserless `/content` endpoint.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use leadscout_core::AppConfig;

use super::{FetchedPage, PageContent, PageFetcher, RenderedPage};
use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

/// Header Browserless sets to the page URL after navigation.
const RESPONSE_URL_HEADER: &str = "x-response-url";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

/// Fetches fully rendered HTML through a headless browser service.
///
/// Each page gets a bounded readiness wait (`render_timeout_secs`); a page
/// that is not ready in time fails with [`ScraperError::RenderTimeout`] and
/// is not retried.
pub struct BrowserlessFetcher {
    client: Client,
    base_url: String,
    token: Option<String>,
    render_timeout: Duration,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl BrowserlessFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] for an empty or unparseable
    /// `base_url` and [`ScraperError::Http`] if the client cannot be built.
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        render_timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        // The HTTP timeout sits a little above the readiness wait so the
        // browser gets to report its own navigation timeout first.
        let client = Client::builder()
            .timeout(Duration::from_secs(render_timeout_secs.saturating_add(10)))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: token.map(String::from),
            render_timeout: Duration::from_secs(render_timeout_secs),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Build from the process configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] when `BROWSERLESS_URL` is unset,
    /// otherwise see [`BrowserlessFetcher::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let base_url =
            config
                .browserless_url
                .as_deref()
                .ok_or_else(|| ScraperError::InvalidUrl {
                    url: String::new(),
                    reason: "BROWSERLESS_URL is required for rendered profile fetches"
                        .to_string(),
                })?;
        Self::new(
            base_url,
            config.browserless_token.as_deref(),
            config.render_timeout_secs,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    fn endpoint(&self) -> String {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(token) = &self.token {
            endpoint.push_str("?token=");
            endpoint.push_str(token);
        }
        endpoint
    }

    /// Rendered HTML plus the URL the browser ended up on.
    async fn post_content(
        &self,
        url: &str,
        body: &ContentRequest<'_>,
    ) -> Result<(String, String), ScraperError> {
        let resp = self.client.post(self.endpoint()).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ScraperError::Browser {
                status: status.as_u16(),
                url: url.to_owned(),
                message,
            });
        }
        let loaded_url = resp
            .headers()
            .get(RESPONSE_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| url.to_owned(), str::to_owned);
        Ok((resp.text().await?, loaded_url))
    }

    async fn render_once(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = self.render_timeout.as_millis() as u64;
        let body = ContentRequest {
            url,
            goto_options: GotoOptions {
                wait_until: "domcontentloaded",
                timeout: timeout_ms,
            },
        };

        let (html, loaded_url) =
            tokio::time::timeout(self.render_timeout, self.post_content(url, &body))
                .await
                .map_err(|_| ScraperError::RenderTimeout {
                    url: url.to_owned(),
                    timeout_secs: self.render_timeout.as_secs(),
                })??;

        if html.trim().is_empty() {
            return Err(ScraperError::EmptyBody {
                url: url.to_owned(),
            });
        }

        Ok(FetchedPage {
            requested_url: url.to_owned(),
            loaded_url,
            content: PageContent::Rendered(RenderedPage::new(html)),
        })
    }
}

impl PageFetcher for BrowserlessFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, ScraperError>> + Send {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, move || {
            self.render_once(url)
        })
    }
}
