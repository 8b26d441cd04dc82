//! WooCommerce REST API (v3) client.
//!
//! [`WooCommerceApi`] signs every request with the store's consumer key and
//! secret, runs it through the retrying [`crate::http::HttpClient`] and hands
//! back the raw response body. [`WooCommerceApi::get_all_products`] walks the
//! product collection page by page.

mod client;
mod config;
mod error;
mod pagination;

pub use client::{API_PREFIX, BROWSER_USER_AGENT, WooCommerceApi};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use pagination::Record;
