//! HTTP client with built-in retry logic and error handling.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, IntoUrl, Method, Request, RequestBuilder};

use super::retry::{RetryPolicy, is_retryable_status};
use super::transport::{RawResponse, ReqwestTransport, Transport};

/// HTTP client that drives a [`Transport`] through a [`RetryPolicy`].
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Creates a new HTTP client executing requests with the given reqwest Client.
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        let transport = Arc::new(ReqwestTransport::new(client.clone()));
        Self {
            client,
            transport,
            policy,
        }
    }

    /// Creates a client that executes requests through a custom transport.
    pub fn with_transport<T: Transport + 'static>(transport: T, policy: RetryPolicy) -> Self {
        Self {
            client: Client::new(),
            transport: Arc::new(transport),
            policy,
        }
    }

    /// Starts building a request; send it with [`HttpClient::execute`].
    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Executes a request, retrying transient failures and retryable statuses.
    ///
    /// When every attempt ends with a retryable status, the last response is
    /// returned so the caller can report it.
    pub async fn execute(&self, request: Request) -> Result<RawResponse> {
        let operation = format!("{} {}", request.method(), request.url());
        let attempts = self.policy.max_attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            let current = request
                .try_clone()
                .context("Request body cannot be replayed")?;

            match self.transport.execute(current).await {
                Ok(response) if is_retryable_status(response.status) && attempt < attempts => {
                    let wait = self.policy.backoff(attempt - 1, Some(&response));
                    warn!(
                        "{}: attempt {}/{} returned {}, retrying in {}ms...",
                        operation,
                        attempt,
                        attempts,
                        response.status,
                        wait.as_millis()
                    );
                    tokio::time::sleep(wait).await;
                }
                Ok(response) => return Ok(response),
                Err(e) if !e.is_transient() => {
                    debug!("{}: non-retryable error: {}", operation, e);
                    return Err(anyhow::Error::from(e));
                }
                Err(e) => {
                    if attempt < attempts {
                        let wait = self.policy.backoff(attempt - 1, None);
                        warn!(
                            "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                            operation,
                            attempt,
                            attempts,
                            e,
                            wait.as_millis()
                        );
                        tokio::time::sleep(wait).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        let giving_up = format!("{}: giving up after {} attempt(s)", operation, attempts);
        Err(match last_error {
            Some(e) => anyhow::Error::from(e).context(giving_up),
            None => anyhow::anyhow!(giving_up),
        })
    }
}
