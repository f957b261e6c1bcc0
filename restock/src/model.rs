/// Model module for the restock reporting layer
///
/// This module defines the read-only inputs handed to the reporter by the
/// scraping side (product links and monitored stores) and the stock-status
/// record pushed to the ingestion endpoint.
use serde::{Deserialize, Serialize, Serializer};

/// A single trackable product listing.
///
/// # Fields
/// * `brand` - Manufacturer shown in the identity string
/// * `series` - Product series, rendered in parentheses after the brand
/// * `model` - Model name, rendered after the brand segment
/// * `url` - Canonical product page
/// * `affiliate_url` - Affiliate link, preferred over `url` when pushing stock status
/// * `cart_url` - Direct add-to-cart link, if the store exposes one
/// * `price` - Last observed price
/// * `cloudflare_retries` - Remaining Cloudflare retry budget tracked by the scraper
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Link {
    pub brand: String,
    pub series: String,
    pub model: String,
    pub url: String,
    pub affiliate_url: Option<String>,
    pub cart_url: Option<String>,
    pub price: Option<f64>,
    pub cloudflare_retries: Option<u32>,
}

impl Link {
    /// URL reported to the ingestion endpoint. Non-empty affiliate links win.
    pub fn reported_url(&self) -> &str {
        self.affiliate_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.url)
    }
}

/// A monitored site.
///
/// `current_proxy_index` and `proxy_list` are only meaningful together; see
/// [`Store::proxy_position`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Store {
    pub name: String,
    pub bulk: bool,
    pub current_proxy_index: Option<usize>,
    pub proxy_list: Option<Vec<String>>,
}

impl Store {
    /// Returns the 1-based proxy position and the proxy count, or `None` unless
    /// both the index and the list are present.
    pub fn proxy_position(&self) -> Option<(usize, usize)> {
        match (self.current_proxy_index, &self.proxy_list) {
            (Some(index), Some(list)) => Some((index.saturating_add(1), list.len())),
            _ => None,
        }
    }
}

/// Stock level carried by a [`StockStatus`] record.
pub const IN_STOCK: u8 = 1;
pub const OUT_OF_STOCK: u8 = 0;

/// Wire payload pushed to the stock-status ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockStatus {
    pub brand: String,
    pub series: String,
    pub name: String,
    pub store: String,
    pub stock: Option<u8>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_price"
    )]
    pub price: Option<f64>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

impl StockStatus {
    pub fn new(link: &Link, store: &Store, stock: u8, meta: Option<String>) -> Self {
        Self {
            brand: link.brand.clone(),
            series: link.series.clone(),
            name: link.model.clone(),
            store: store.name.clone(),
            stock: Some(stock),
            price: link.price,
            url: link.reported_url().to_string(),
            meta,
        }
    }
}

// Whole prices go out as JSON integers so `1599` is not sent as `1599.0`.
fn serialize_price<S>(price: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match price {
        Some(p) if p.fract() == 0.0 && p.abs() < i64::MAX as f64 => {
            serializer.serialize_i64(*p as i64)
        }
        Some(p) => serializer.serialize_f64(*p),
        None => serializer.serialize_none(),
    }
}
