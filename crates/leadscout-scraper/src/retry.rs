//! Retry with exponential back-off and jitter for page fetches.
//!
//! Transient failures (429, connection/timeout errors, 5xx) are retried;
//! everything else is returned on the first failure so a dead candidate
//! costs one request.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition worth retrying.
///
/// Retriable:
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::Http`]: timeout, connect failure, or 5xx.
/// - [`ScraperError::UnexpectedStatus`] / [`ScraperError::Browser`] with a 5xx status.
///
/// Not retriable: 4xx statuses, empty bodies, render timeouts, bad URLs.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } => true,
        ScraperError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ScraperError::UnexpectedStatus { status, .. } | ScraperError::Browser { status, .. } => {
            *status >= 500
        }
        ScraperError::RenderTimeout { .. }
        | ScraperError::EmptyBody { .. }
        | ScraperError::InvalidProxy(_)
        | ScraperError::InvalidUrl { .. } => false,
    }
}

/// Back-off before retry number `attempt` (1-based), before jitter.
///
/// `backoff_base_secs * 2^(attempt-1)`, raised to a rate limit's
/// `Retry-After` when that is longer, never above [`MAX_DELAY_MS`].
fn backoff_delay_ms(attempt: u32, backoff_base_secs: u64, err: &ScraperError) -> u64 {
    let exponential = backoff_base_secs
        .saturating_mul(1000)
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let retry_after = match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    exponential.max(retry_after).min(MAX_DELAY_MS)
}

/// Scale `delay_ms` by a random factor in `[0.75, 1.25)`.
fn with_jitter(delay_ms: u64) -> Duration {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (delay_ms as f64 * rand::random_range(0.75..1.25)) as u64;
    Duration::from_millis(jittered)
}

/// Run `fetch`, retrying transient errors up to `max_retries` extra times.
///
/// With `max_retries = 2` the fetch is attempted at most 3 times. The last
/// error is returned once retries run out or a non-transient error occurs.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut fetch: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match fetch().await {
            Ok(value) => return Ok(value),
            Err(err) if retries >= max_retries || !is_retriable(&err) => return Err(err),
            Err(err) => err,
        };
        retries += 1;

        let delay = with_jitter(backoff_delay_ms(retries, backoff_base_secs, &err));
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient fetch error, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const URL: &str = "https://www.instagram.com/jane/";

    fn status(code: u16) -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: code,
            url: URL.to_owned(),
        }
    }

    fn throttled() -> ScraperError {
        ScraperError::RateLimited {
            url: URL.to_owned(),
            retry_after_secs: 0,
        }
    }

    /// Replays `script` one outcome per attempt; returns the final result
    /// and how many attempts were made.
    async fn replay(
        max_retries: u32,
        script: Vec<Result<&'static str, ScraperError>>,
    ) -> (Result<&'static str, ScraperError>, usize) {
        let total = script.len();
        let remaining = Mutex::new(VecDeque::from(script));
        let result = retry_with_backoff(max_retries, 0, || {
            let next = remaining
                .lock()
                .unwrap()
                .pop_front()
                .expect("script ran out of outcomes");
            async move { next }
        })
        .await;
        let left = remaining.lock().unwrap().len();
        (result, total - left)
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retry() {
        let (result, attempts) = replay(3, vec![Ok("page")]).await;
        assert_eq!(result.unwrap(), "page");
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn rate_limits_are_retried_until_success() {
        let (result, attempts) =
            replay(3, vec![Err(throttled()), Err(throttled()), Ok("page")]).await;
        assert_eq!(result.unwrap(), "page");
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn retries_stop_at_the_limit() {
        let script = vec![Err(throttled()), Err(throttled()), Err(throttled()), Ok("late")];
        let (result, attempts) = replay(2, script).await;
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn not_found_fails_on_first_attempt() {
        let (result, attempts) = replay(3, vec![Err(status(404)), Ok("unreached")]).await;
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 404, .. })
        ));
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let (result, attempts) = replay(1, vec![Err(status(503)), Err(status(502))]).await;
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 502, .. })
        ));
        assert_eq!(attempts, 2);
    }

    #[test]
    fn delay_doubles_per_retry_and_caps() {
        let err = ScraperError::UnexpectedStatus {
            status: 502,
            url: "https://www.instagram.com/jane/".to_owned(),
        };
        assert_eq!(backoff_delay_ms(1, 2, &err), 2_000);
        assert_eq!(backoff_delay_ms(2, 2, &err), 4_000);
        assert_eq!(backoff_delay_ms(3, 2, &err), 8_000);
        assert_eq!(backoff_delay_ms(9, 2, &err), MAX_DELAY_MS);
    }

    #[test]
    fn delay_honours_longer_retry_after() {
        let err = ScraperError::RateLimited {
            url: "https://www.google.com/search?q=x".to_owned(),
            retry_after_secs: 30,
        };
        assert_eq!(backoff_delay_ms(1, 2, &err), 30_000);

        let huge = ScraperError::RateLimited {
            url: "https://www.google.com/search?q=x".to_owned(),
            retry_after_secs: 3_600,
        };
        assert_eq!(backoff_delay_ms(1, 2, &huge), MAX_DELAY_MS);
    }

    #[test]
    fn jitter_stays_within_a_quarter() {
        for _ in 0..50 {
            let ms = with_jitter(4_000).as_millis();
            assert!((3_000..5_000).contains(&ms), "jittered delay {ms} out of range");
        }
    }

    #[test]
    fn render_timeout_is_not_retriable() {
        assert!(!is_retriable(&ScraperError::RenderTimeout {
            url: "https://www.instagram.com/jane/".to_owned(),
            timeout_secs: 20,
        }));
    }
}
