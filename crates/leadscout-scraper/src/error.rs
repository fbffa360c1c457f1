use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("browser endpoint returned {status} for {url}: {message}")]
    Browser {
        status: u16,
        url: String,
        message: String,
    },

    #[error("page readiness wait exceeded {timeout_secs}s for {url}")]
    RenderTimeout { url: String, timeout_secs: u64 },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    #[error("invalid proxy URL: {0}")]
    InvalidProxy(String),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
