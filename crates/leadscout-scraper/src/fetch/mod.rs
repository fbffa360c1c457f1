//! The fetch service: page fetchers and the bounded, concurrent driver that
//! runs them over a set of URLs.
//!
//! Controllers never see HTTP. They hand a URL set and a request budget to
//! [`FetchService::run`] and consume the pages that loaded; failed URLs are
//! logged here and simply produce no item.

mod browserless;
mod http;

use std::collections::HashSet;
use std::future::Future;
use std::sync::LazyLock;

use futures::stream::{self, Stream, StreamExt};
use regex::Regex;

use crate::error::ScraperError;
use crate::extract_helpers::find_time_datetime;

pub use browserless::BrowserlessFetcher;
pub use http::HttpFetcher;

static PRIVATE_BANNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)this\s+account\s+is\s+private").expect("valid private banner regex")
});
static LOGIN_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<form\b[^>]*(?:\bid\s*=\s*["']loginForm["']|\baction\s*=\s*["'][^"']*/accounts/login)"#,
    )
    .expect("valid login form regex")
});

/// A browser-rendered DOM snapshot of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    html: String,
}

impl RenderedPage {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Serialized DOM.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.html
    }

    /// `datetime` of the first `<time>` element, if the DOM has one.
    #[must_use]
    pub fn time_datetime(&self) -> Option<String> {
        find_time_datetime(&self.html)
    }

    /// `true` when the page shows the private-account notice.
    #[must_use]
    pub fn shows_private_banner(&self) -> bool {
        PRIVATE_BANNER_RE.is_match(&self.html)
    }

    /// `true` when the DOM is the login form instead of a profile.
    #[must_use]
    pub fn shows_login_wall(&self) -> bool {
        LOGIN_FORM_RE.is_match(&self.html)
    }
}

/// Body of a loaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Raw response body from a plain HTTP fetch.
    Static(String),
    /// DOM snapshot from a headless browser.
    Rendered(RenderedPage),
}

impl PageContent {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PageContent::Static(body) => body,
            PageContent::Rendered(page) => page.content(),
        }
    }
}

/// One successfully loaded URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL as submitted to the service.
    pub requested_url: String,
    /// URL after redirects, when the fetcher can observe it.
    pub loaded_url: String,
    pub content: PageContent,
}

/// Loads a single URL.
///
/// Implementations own their retry policy; an `Err` means the URL is given up on.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, ScraperError>> + Send;
}

/// Drives a [`PageFetcher`] over a URL set with bounded concurrency and a
/// per-run request budget.
pub struct FetchService<F> {
    fetcher: F,
    concurrency: usize,
}

impl<F: PageFetcher> FetchService<F> {
    /// `concurrency` below 1 is treated as 1.
    pub fn new(fetcher: F, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch at most `max_requests` distinct URLs from `urls`, yielding each
    /// page as soon as it loads. Completion order is not submission order.
    ///
    /// Requests are started lazily as the stream is polled, so a consumer that
    /// stops polling (or drops the stream) starts no further requests and
    /// abandons the in-flight ones.
    pub fn run(
        &self,
        urls: Vec<String>,
        max_requests: usize,
    ) -> impl Stream<Item = FetchedPage> + '_ {
        let mut seen = HashSet::new();
        let unique: Vec<String> = urls
            .into_iter()
            .filter(|url| seen.insert(url.clone()))
            .take(max_requests)
            .collect();

        tracing::debug!(
            requests = unique.len(),
            concurrency = self.concurrency,
            "fetch service starting"
        );

        stream::iter(unique)
            .map(move |url| async move {
                match self.fetcher.fetch(&url).await {
                    Ok(page) => Some(page),
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "fetch failed, dropping url");
                        None
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(futures::future::ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves fixed bodies; URLs containing "fail" error out.
    struct StubFetcher {
        calls: Mutex<Vec<String>>,
        started: AtomicUsize,
    }

    impl StubFetcher {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                started: AtomicUsize::new(0),
            }
        }
    }

    impl PageFetcher for StubFetcher {
        fn fetch(
            &self,
            url: &str,
        ) -> impl Future<Output = Result<FetchedPage, ScraperError>> + Send {
            self.started.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(url.to_string());
            let url = url.to_string();
            async move {
                if url.contains("fail") {
                    Err(ScraperError::UnexpectedStatus { status: 404, url })
                } else {
                    Ok(FetchedPage {
                        requested_url: url.clone(),
                        loaded_url: url.clone(),
                        content: PageContent::Static(format!("<html>{url}</html>")),
                    })
                }
            }
        }
    }

    #[tokio::test]
    async fn failed_urls_produce_no_item() {
        let service = FetchService::new(StubFetcher::new(), 2);
        let pages: Vec<FetchedPage> = service
            .run(
                vec![
                    "https://a.test/ok".to_string(),
                    "https://a.test/fail".to_string(),
                    "https://a.test/ok2".to_string(),
                ],
                10,
            )
            .collect()
            .await;
        let mut urls: Vec<&str> = pages.iter().map(|p| p.requested_url.as_str()).collect();
        urls.sort_unstable();
        assert_eq!(urls, vec!["https://a.test/ok", "https://a.test/ok2"]);
    }

    #[tokio::test]
    async fn request_budget_caps_fetches() {
        let service = FetchService::new(StubFetcher::new(), 4);
        let urls = (0..10).map(|i| format!("https://a.test/{i}")).collect();
        let pages: Vec<FetchedPage> = service.run(urls, 3).collect().await;
        assert_eq!(pages.len(), 3);
        assert_eq!(service.fetcher().started.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn duplicate_urls_are_fetched_once() {
        let service = FetchService::new(StubFetcher::new(), 1);
        let urls = vec![
            "https://a.test/x".to_string(),
            "https://a.test/x".to_string(),
        ];
        let pages: Vec<FetchedPage> = service.run(urls, 10).collect().await;
        assert_eq!(pages.len(), 1);
        assert_eq!(service.fetcher().calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dropping_the_stream_starts_no_more_requests() {
        let service = FetchService::new(StubFetcher::new(), 1);
        let urls = (0..5).map(|i| format!("https://a.test/{i}")).collect();
        {
            let mut pages = Box::pin(service.run(urls, 5));
            let first = pages.next().await;
            assert!(first.is_some());
        }
        assert_eq!(service.fetcher().started.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rendered_page_exposes_dom_signals() {
        let page = RenderedPage::new(
            r#"<h2>This Account is Private</h2><time datetime="2024-01-02T00:00:00Z">Jan 2</time>"#,
        );
        assert!(page.shows_private_banner());
        assert_eq!(
            page.time_datetime().as_deref(),
            Some("2024-01-02T00:00:00Z")
        );
        assert!(!RenderedPage::new("<main></main>").shows_private_banner());
    }

    #[test]
    fn rendered_page_detects_login_form() {
        let by_id = RenderedPage::new(r#"<form id="loginForm" method="post"></form>"#);
        assert!(by_id.shows_login_wall());

        let by_action = RenderedPage::new(
            r#"<form method="post" action="/accounts/login/ajax/"><input name="username"></form>"#,
        );
        assert!(by_action.shows_login_wall());

        let profile_with_login_link = RenderedPage::new(
            r#"<form action="/search/"></form><a href="/accounts/login/">Log in</a>"#,
        );
        assert!(!profile_with_login_link.shows_login_wall());
    }
}
