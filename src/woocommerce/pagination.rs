//! Walking paginated collections page by page.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::client::WooCommerceApi;
use super::error::ApiError;

/// A decoded collection item with whatever fields the store returned.
pub type Record = Map<String, Value>;

impl WooCommerceApi {
    /// Fetches every product, `per_page` at a time, until the store returns an
    /// empty page.
    pub async fn get_all_products(&self, per_page: u32) -> Result<Vec<Record>> {
        self.fetch_all("products", per_page, None).await
    }

    /// Fetches `endpoint` page by page starting at page 1 and concatenates
    /// the pages in order.
    ///
    /// Stops at the first empty page, or after `max_pages` pages when a limit
    /// is given. Any request or decode error aborts the whole walk.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        per_page: u32,
        max_pages: Option<u32>,
    ) -> Result<Vec<T>> {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            if max_pages.is_some_and(|limit| page > limit) {
                warn!(
                    "Stopped fetching {} after {} page(s); more may be available",
                    endpoint,
                    page - 1
                );
                break;
            }

            debug!("Fetching {} page {}...", endpoint, page);

            let params = HashMap::from([
                ("per_page".to_string(), per_page.to_string()),
                ("page".to_string(), page.to_string()),
            ]);
            let body = self.get(endpoint, &params).await?;

            let parsed: Vec<T> =
                serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
                    endpoint: endpoint.to_string(),
                    page,
                    source,
                })?;

            if parsed.is_empty() {
                break;
            }

            records.extend(parsed);
            page = next_page(page, endpoint)?;
        }

        debug!("Fetched {} item(s) from {}", records.len(), endpoint);
        Ok(records)
    }
}

fn next_page(page: u32, endpoint: &str) -> Result<u32> {
    page.checked_add(1)
        .with_context(|| format!("Page counter overflowed while fetching {}", endpoint))
}
