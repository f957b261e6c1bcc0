/// Outcome module for the restock reporting layer
///
/// Each monitoring check ends in exactly one [`Outcome`]. The enum is the
/// single table for how an outcome is decorated, which text it appends to the
/// identity string, how that text is colored and whether it produces a
/// stock-status push.
use colored::{ColoredString, Colorize};
use serde::Deserialize;

use crate::model::{IN_STOCK, Link, OUT_OF_STOCK};

pub const FAILURE_GLYPH: &str = "✖";
pub const INFO_GLYPH: &str = "ℹ";
pub const CELEBRATE_OPEN: &str = "🚀🚨";
pub const CELEBRATE_CLOSE: &str = "🚨🚀";

/// Result of a single monitoring check, as decided by the scraper.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Backoff {
        status_code: u16,
        delay: u64,
    },
    BadStatusCode {
        status_code: u16,
    },
    BannedSeller,
    Captcha,
    Cloudflare,
    InStock {
        /// Drop the celebratory glyphs, for text-message style sinks.
        #[serde(default)]
        sms: bool,
        #[serde(default)]
        meta: Option<String>,
    },
    InStockWaiting,
    MaxPrice {
        max_price: f64,
    },
    NoResponse,
    OutOfStock {
        #[serde(default)]
        meta: Option<String>,
    },
    ProductInStock,
    RateLimit,
    RecursionLimit,
}

/// How the rendered line is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// `✖ {identity} :: {suffix}`
    Failure,
    /// `ℹ {identity} :: {suffix}`
    Info,
    /// `🚀🚨 {identity} :: {suffix} 🚨🚀`
    Celebrate,
    /// Multi-line product page listing, no identity string.
    Bare,
}

impl Outcome {
    /// Stable name of the outcome kind, matching the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Backoff { .. } => "backoff",
            Outcome::BadStatusCode { .. } => "bad_status_code",
            Outcome::BannedSeller => "banned_seller",
            Outcome::Captcha => "captcha",
            Outcome::Cloudflare => "cloudflare",
            Outcome::InStock { .. } => "in_stock",
            Outcome::InStockWaiting => "in_stock_waiting",
            Outcome::MaxPrice { .. } => "max_price",
            Outcome::NoResponse => "no_response",
            Outcome::OutOfStock { .. } => "out_of_stock",
            Outcome::ProductInStock => "product_in_stock",
            Outcome::RateLimit => "rate_limit",
            Outcome::RecursionLimit => "recursion_limit",
        }
    }

    pub fn decoration(&self) -> Decoration {
        match self {
            Outcome::InStock { .. } => Decoration::Celebrate,
            Outcome::InStockWaiting => Decoration::Info,
            Outcome::ProductInStock => Decoration::Bare,
            _ => Decoration::Failure,
        }
    }

    /// Literal text following `::` in the rendered line.
    ///
    /// For [`Outcome::ProductInStock`] this is the whole multi-line listing.
    pub fn suffix(&self, link: &Link) -> String {
        match self {
            Outcome::Backoff { status_code, delay } => {
                format!("BACKOFF DELAY status={} delay={}", status_code, delay)
            }
            Outcome::BadStatusCode { status_code } => format!("STATUS CODE ERROR {}", status_code),
            Outcome::BannedSeller => "BANNED SELLER".to_string(),
            Outcome::Captcha => "CAPTCHA".to_string(),
            Outcome::Cloudflare => "CLOUDFLARE, WAITING".to_string(),
            Outcome::InStock { .. } => "IN STOCK".to_string(),
            Outcome::InStockWaiting => "IN STOCK, WAITING".to_string(),
            Outcome::MaxPrice { max_price } => format!(
                "PRICE {} EXCEEDS LIMIT {}",
                link.price.map(|p| p.to_string()).unwrap_or_default(),
                max_price
            ),
            Outcome::NoResponse => "NO RESPONSE".to_string(),
            Outcome::OutOfStock { .. } => "OUT OF STOCK".to_string(),
            Outcome::ProductInStock => match &link.cart_url {
                Some(cart_url) => {
                    format!("Product Page: {}\nAdd To Cart Link: {}", link.url, cart_url)
                }
                None => format!("Product Page: {}", link.url),
            },
            Outcome::RateLimit => "RATE LIMIT EXCEEDED".to_string(),
            Outcome::RecursionLimit => "CLOUDFLARE RETRY LIMIT REACHED, ABORT".to_string(),
        }
    }

    /// Applies the suffix color used in colorized output.
    pub fn paint_suffix(&self, suffix: &str) -> ColoredString {
        match self {
            Outcome::OutOfStock { .. } => suffix.red(),
            _ => suffix.yellow(),
        }
    }

    /// Stock level and caller metadata to push, for the two stock transitions.
    pub fn stock_push(&self) -> Option<(u8, Option<String>)> {
        match self {
            Outcome::InStock { meta, .. } => Some((IN_STOCK, meta.clone())),
            Outcome::OutOfStock { meta } => Some((OUT_OF_STOCK, meta.clone())),
            _ => None,
        }
    }
}
