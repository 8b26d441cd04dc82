use std::fmt;
use std::time::Duration;

use crate::http::{DEFAULT_MAX_RETRIES, RetryPolicy};

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for one store. Immutable once handed to the client.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::new(DEFAULT_MAX_RETRIES),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_retry_wait(mut self, min_wait: Duration, max_wait: Duration) -> Self {
        self.retry = self.retry.with_wait(min_wait, max_wait);
        self
    }

    /// Store root URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `consumer_key:consumer_secret`, sent as the Basic auth username.
    pub fn credentials(&self) -> String {
        format!("{}:{}", self.consumer_key, self.consumer_secret)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"*********")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}
