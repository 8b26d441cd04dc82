//! HTTP client module with retry logic and error handling.

mod client;
mod retry;
mod transport;

pub use client::HttpClient;
#[cfg(test)]
pub use transport::MockTransport;
pub use retry::{DEFAULT_MAX_RETRIES, RetryPolicy, is_retryable_status};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
