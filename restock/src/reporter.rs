/// Reporter module for the restock reporting layer
///
/// The Reporter turns a monitoring [`Outcome`] into the line handed to the log
/// sink and, for stock transitions, hands a [`StockStatus`] record to the
/// configured publisher without waiting for delivery.
use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    config::IngestConfig,
    identity,
    model::{Link, StockStatus, Store},
    outcome::{CELEBRATE_CLOSE, CELEBRATE_OPEN, Decoration, FAILURE_GLYPH, INFO_GLYPH, Outcome},
    publisher::{HttpPublisher, IngestRoute, StockPublisher},
};

pub struct Reporter {
    publisher: Arc<dyn StockPublisher>,
}

impl Reporter {
    pub fn new(publisher: Arc<dyn StockPublisher>) -> Self {
        Self { publisher }
    }

    /// Creates a Reporter that pushes stock status over HTTP.
    pub fn from_config(conf: &IngestConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpPublisher::new(conf)?)))
    }

    /// Renders the line for `outcome` and triggers a stock-status push for
    /// in-stock and out-of-stock outcomes.
    ///
    /// Never fails and never waits on the push.
    pub fn report(&self, link: &Link, store: &Store, outcome: &Outcome, color: bool) -> String {
        if let Some((stock, meta)) = outcome.stock_push() {
            self.push(link, store, stock, meta);
        }

        let suffix = outcome.suffix(link);
        match outcome.decoration() {
            Decoration::Bare => suffix,
            Decoration::Celebrate => {
                let sms = matches!(outcome, Outcome::InStock { sms: true, .. });
                let line = format!("{} :: {}", identity::product(link, store, false), suffix);
                let line = if sms {
                    line
                } else {
                    format!("{} {} {}", CELEBRATE_OPEN, line, CELEBRATE_CLOSE)
                };
                if color {
                    line.on_green().white().bold().to_string()
                } else {
                    line
                }
            }
            decoration @ (Decoration::Failure | Decoration::Info) => {
                let glyph = if decoration == Decoration::Info {
                    INFO_GLYPH
                } else {
                    FAILURE_GLYPH
                };
                if color {
                    format!(
                        "{} {} :: {}",
                        glyph,
                        identity::product(link, store, true),
                        outcome.paint_suffix(&suffix)
                    )
                } else {
                    format!("{} {} :: {}", glyph, identity::product(link, store, false), suffix)
                }
            }
        }
    }

    /// Renders a free-form setup message for `store`.
    pub fn message(&self, text: &str, topic: &str, store: &Store, color: bool) -> String {
        if color {
            return format!(
                "{} {} :: {}",
                FAILURE_GLYPH,
                identity::setup(topic, store, true),
                text.yellow()
            );
        }

        format!("{} {} :: {}", FAILURE_GLYPH, identity::setup(topic, store, false), text)
    }

    fn push(&self, link: &Link, store: &Store, stock: u8, meta: Option<String>) {
        let route = IngestRoute::for_bulk(store.bulk);
        if needs_meta_warning(store, meta.as_deref()) {
            // Bypasses the log filter.
            eprintln!("{}", meta_warning(link, store));
        }

        tracing::debug!(store = %store.name, path = route.path(), stock, "Pushing stock status");
        self.publisher
            .publish(route, StockStatus::new(link, store, stock, meta));
    }
}

/// Bulk pushes are expected to carry metadata; an empty string counts as none.
fn needs_meta_warning(store: &Store, meta: Option<&str>) -> bool {
    store.bulk && meta.is_none_or(str::is_empty)
}

fn meta_warning(link: &Link, store: &Store) -> String {
    format!("Meta is empty for a BULK request! [{}] {}", store.name, link.model)
}
