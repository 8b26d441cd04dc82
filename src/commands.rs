//! Helpers behind the `wcapi` subcommands.

use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result, bail};
use log::info;
use serde_json::Value;

use crate::woocommerce::WooCommerceApi;

/// Page size used when none is given.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Fetches every product and writes one JSON object per line.
/// Returns the number of products written.
#[tracing::instrument(skip(api, out))]
pub async fn print_products<W: Write>(
    api: &WooCommerceApi,
    per_page: u32,
    max_pages: Option<u32>,
    out: &mut W,
) -> Result<usize> {
    let products = if let Some(limit) = max_pages {
        api.fetch_all("products", per_page, Some(limit)).await?
    } else {
        api.get_all_products(per_page).await?
    };

    for product in &products {
        serde_json::to_writer(&mut *out, product).context("Failed to write product")?;
        writeln!(out)?;
    }

    info!("Printed {} product(s)", products.len());
    Ok(products.len())
}

/// Writes a raw response body, terminated by a newline.
pub fn print_body<W: Write>(body: &[u8], out: &mut W) -> Result<()> {
    out.write_all(body)?;
    if !body.ends_with(b"\n") {
        writeln!(out)?;
    }
    Ok(())
}

/// Parses a `key=value` query parameter.
pub fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Invalid parameter '{}'. Expected KEY=VALUE.", s)),
    }
}

/// Collects query parameters, rejecting a key given more than once.
pub fn collect_params(pairs: Vec<(String, String)>) -> Result<HashMap<String, String>> {
    let mut params = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        if params.contains_key(&key) {
            bail!("Query parameter '{}' given more than once", key);
        }
        params.insert(key, value);
    }
    Ok(params)
}

/// Parses a JSON request payload given on the command line.
pub fn parse_payload(s: &str) -> Result<Value> {
    serde_json::from_str(s).context("Invalid JSON payload")
}
