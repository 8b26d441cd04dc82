//! Retry policy for transient network failures and retryable status codes.

use std::time::Duration;

use reqwest::{StatusCode, header::RETRY_AFTER};

use super::transport::RawResponse;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Default wait before the first retry.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(1);

/// Upper bound for the exponential backoff.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` means a single attempt.
    pub max_retries: usize,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    #[must_use]
    pub fn with_wait(mut self, min_wait: Duration, max_wait: Duration) -> Self {
        self.min_wait = min_wait;
        self.max_wait = max_wait.max(min_wait);
        self
    }

    /// Total number of attempts, including the first one.
    pub fn max_attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }

    /// Wait before retry number `retry` (0-based).
    ///
    /// A `Retry-After` header in seconds on a 429 or 503 response wins over
    /// the exponential schedule.
    pub fn backoff(&self, retry: usize, response: Option<&RawResponse>) -> Duration {
        if let Some(wait) = response.and_then(retry_after) {
            return wait;
        }

        let factor = u32::try_from(retry)
            .ok()
            .and_then(|r| 1u32.checked_shl(r))
            .unwrap_or(u32::MAX);

        self.min_wait.saturating_mul(factor).min(self.max_wait)
    }
}

/// Status codes worth another attempt: 429 and every 5xx except 501.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

fn retry_after(response: &RawResponse) -> Option<Duration> {
    if response.status != StatusCode::TOO_MANY_REQUESTS
        && response.status != StatusCode::SERVICE_UNAVAILABLE
    {
        return None;
    }

    response
        .headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn with_retry_after(status: StatusCode, value: &str) -> RawResponse {
        let mut response = RawResponse::new(status, Vec::new());
        response
            .headers
            .insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        response
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.min_wait, Duration::from_secs(1));
        assert_eq!(policy.max_wait, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_retries_is_single_attempt() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }

    #[test]
    fn test_max_attempts_saturates() {
        assert_eq!(RetryPolicy::new(usize::MAX).max_attempts(), usize::MAX);
    }

    #[test]
    fn test_backoff_doubles_until_capped() {
        let policy = RetryPolicy::new(10);
        assert_eq!(policy.backoff(0, None), Duration::from_secs(1));
        assert_eq!(policy.backoff(1, None), Duration::from_secs(2));
        assert_eq!(policy.backoff(2, None), Duration::from_secs(4));
        assert_eq!(policy.backoff(4, None), Duration::from_secs(16));
        assert_eq!(policy.backoff(5, None), Duration::from_secs(30));
        assert_eq!(policy.backoff(64, None), Duration::from_secs(30));
    }

    #[test]
    fn test_with_wait_never_inverts_bounds() {
        let policy = RetryPolicy::new(1).with_wait(Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(policy.max_wait, Duration::from_secs(5));
        assert_eq!(policy.backoff(3, None), Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_honors_retry_after_on_429() {
        let policy = RetryPolicy::new(3);
        let response = with_retry_after(StatusCode::TOO_MANY_REQUESTS, "7");
        assert_eq!(policy.backoff(0, Some(&response)), Duration::from_secs(7));
    }

    #[test]
    fn test_backoff_honors_retry_after_on_503() {
        let policy = RetryPolicy::new(3);
        let response = with_retry_after(StatusCode::SERVICE_UNAVAILABLE, " 2 ");
        assert_eq!(policy.backoff(2, Some(&response)), Duration::from_secs(2));
    }

    #[test]
    fn test_backoff_ignores_retry_after_on_other_status() {
        let policy = RetryPolicy::new(3);
        let response = with_retry_after(StatusCode::BAD_GATEWAY, "9");
        assert_eq!(policy.backoff(0, Some(&response)), Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_ignores_http_date_retry_after() {
        let policy = RetryPolicy::new(3);
        let response = with_retry_after(
            StatusCode::TOO_MANY_REQUESTS,
            "Wed, 21 Oct 2015 07:28:00 GMT",
        );
        assert_eq!(policy.backoff(1, Some(&response)), Duration::from_secs(2));
    }

    #[test]
    fn test_is_retryable_status() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable_status(StatusCode::NOT_IMPLEMENTED));
        assert!(!is_retryable_status(StatusCode::OK));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
    }
}
