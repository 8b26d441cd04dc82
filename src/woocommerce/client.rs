//! Authenticated access to the WooCommerce REST API.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client, Method,
    header::{CONTENT_TYPE, USER_AGENT},
};
use serde::Serialize;

use crate::http::{HttpClient, Transport};

use super::config::ClientConfig;
use super::error::ApiError;

/// Versioned path prefix every endpoint is appended to.
pub const API_PREFIX: &str = "wp-json/wc/v3";

/// Browser User-Agent; some hosts reject requests from unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// WooCommerce REST API client.
///
/// Holds only immutable settings, so it can be cloned and shared freely.
#[derive(Clone)]
pub struct WooCommerceApi {
    http: HttpClient,
    base_url: String,
    credentials: String,
}

impl WooCommerceApi {
    /// Creates a client that talks to the store over HTTPS with the configured
    /// per-attempt timeout and retry ceiling.
    #[tracing::instrument]
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let http = HttpClient::new(client, config.retry_policy());
        Ok(Self::from_http_client(http, &config))
    }

    /// Creates a client that executes requests through `transport`.
    pub fn with_transport<T: Transport + 'static>(config: ClientConfig, transport: T) -> Self {
        let http = HttpClient::with_transport(transport, config.retry_policy());
        Self::from_http_client(http, &config)
    }

    fn from_http_client(http: HttpClient, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url().to_string(),
            credentials: config.credentials(),
        }
    }

    /// Full URL of `endpoint`, without query parameters.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, endpoint)
    }

    /// Sends one logical request and returns the raw response body.
    ///
    /// A payload is encoded as JSON before anything goes on the wire.
    /// Responses with status >= 400 become [`ApiError::Status`].
    #[tracing::instrument(skip(self, payload, params))]
    pub async fn request<P>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&P>,
        params: Option<&HashMap<String, String>>,
    ) -> Result<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoint_url(endpoint);

        let body = payload
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|source| ApiError::Serialize {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .basic_auth(&self.credentials, Some(""))
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, BROWSER_USER_AGENT);

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let request = builder
            .build()
            .with_context(|| format!("Failed to build request for {}", url))?;

        debug!("{} {}...", method, request.url());

        let response = self
            .http
            .execute(request)
            .await
            .with_context(|| ApiError::RequestFailed {
                method: method.clone(),
                url: url.clone(),
            })?;

        if response.status.as_u16() >= 400 {
            return Err(ApiError::Status {
                status: response.status,
                body: response.body_text(),
            }
            .into());
        }

        debug!(
            "{} {} -> {} ({} bytes)",
            method,
            url,
            response.status,
            response.body.len()
        );

        Ok(response.body)
    }

    pub async fn get(&self, endpoint: &str, params: &HashMap<String, String>) -> Result<Vec<u8>> {
        self.request(Method::GET, endpoint, None::<&()>, Some(params))
            .await
    }

    pub async fn post<P>(&self, endpoint: &str, data: &P) -> Result<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, Some(data), None).await
    }

    pub async fn put<P>(&self, endpoint: &str, data: &P) -> Result<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, Some(data), None).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Vec<u8>> {
        self.request(Method::DELETE, endpoint, None::<&()>, None)
            .await
    }
}
