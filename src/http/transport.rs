//! Single-attempt request execution.

use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode, header::HeaderMap};

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure to obtain a response for a single attempt.
#[derive(Debug)]
pub enum TransportError {
    /// Connection, timeout or body read failures that may succeed on another attempt
    Transient(String),
    /// Failures another attempt cannot fix (malformed request, redirect policy)
    Fatal(String),
}

impl TransportError {
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Transient(_))
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Transient(msg) => write!(f, "Transient transport error: {}", msg),
            TransportError::Fatal(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let msg = match std::error::Error::source(&error) {
            Some(source) => format!("{}: {}", error, source),
            None => error.to_string(),
        };

        if error.is_builder() || error.is_redirect() {
            return TransportError::Fatal(msg);
        }

        // Connect errors, timeouts and interrupted bodies
        TransportError::Transient(msg)
    }
}

/// Executes exactly one request attempt and reads the whole body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<RawResponse, TransportError>;
}

/// Transport backed by a reqwest [`Client`].
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<RawResponse, TransportError> {
        let response = self.client.execute(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
