use reqwest::{Method, StatusCode};

/// Failures reported by [`super::WooCommerceApi`].
#[derive(Debug)]
pub enum ApiError {
    /// The request payload could not be encoded as JSON.
    Serialize {
        endpoint: String,
        source: serde_json::Error,
    },
    /// No usable response was obtained, even after retries.
    RequestFailed { method: Method, url: String },
    /// The store answered with status >= 400. The body is kept verbatim.
    Status { status: StatusCode, body: String },
    /// A collection page did not decode as a JSON array of objects.
    Decode {
        endpoint: String,
        page: u32,
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status of an application-level failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Serialize { endpoint, .. } => {
                write!(f, "Failed to encode payload for {}", endpoint)
            }
            ApiError::RequestFailed { method, url } => {
                write!(f, "API request failed: {} {}", method, url)
            }
            ApiError::Status { status, body } => {
                write!(
                    f,
                    "API request failed with status code {}: {}",
                    status.as_u16(),
                    body
                )
            }
            ApiError::Decode { endpoint, page, .. } => {
                write!(f, "Failed to decode {} page {}", endpoint, page)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Serialize { source, .. } | ApiError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
