/// Publisher module for the restock reporting layer
///
/// Stock-status records leave the process through a [`StockPublisher`]. The
/// HTTP implementation posts each record on its own task and only logs the
/// outcome.
use anyhow::{Context, Result, anyhow};
use std::sync::Arc;

use crate::{config::IngestConfig, model::StockStatus};

/// Ingestion path a stock-status record is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestRoute {
    Stock,
    Bulk,
}

impl IngestRoute {
    pub fn for_bulk(bulk: bool) -> Self {
        if bulk { IngestRoute::Bulk } else { IngestRoute::Stock }
    }

    pub fn path(&self) -> &'static str {
        match self {
            IngestRoute::Stock => "/stock",
            IngestRoute::Bulk => "/stock/bulk",
        }
    }
}

/// Delivers stock-status records to the ingestion endpoint.
///
/// `publish` must return without waiting for delivery. Implementations own
/// their failure handling; nothing is reported back to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait StockPublisher: Send + Sync {
    fn publish(&self, route: IngestRoute, record: StockStatus);
}

/// Publisher that posts JSON records over HTTP on the current tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    base_url: Option<Arc<str>>,
    client: reqwest::Client,
}

impl HttpPublisher {
    pub fn new(conf: &IngestConfig) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .timeout(conf.timeout)
            .build()
            .with_context(|| "Failed to build reqwest client")?;

        Ok(Self {
            base_url: conf
                .base_url
                .as_deref()
                .map(|url| Arc::from(url.trim_end_matches('/'))),
            client,
        })
    }

    /// Posts a single record and waits for the response.
    pub async fn send(&self, route: IngestRoute, record: &StockStatus) -> Result<()> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| anyhow!("no ingest base url configured"))?;
        let url = format!("{}{}", base_url, route.path());

        self.client
            .post(&url)
            .json(record)
            .send()
            .await
            .with_context(|| format!("Failed to post stock status to {}", url))?
            .error_for_status()
            .with_context(|| format!("Stock status server rejected record at {}", url))?;

        Ok(())
    }
}

impl StockPublisher for HttpPublisher {
    fn publish(&self, route: IngestRoute, record: StockStatus) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!("Dropping stock status for {}: no runtime: {}", record.name, e);
                return;
            }
        };

        let publisher = self.clone();
        runtime.spawn(async move {
            match publisher.send(route, &record).await {
                Ok(()) => tracing::info!(
                    store = %record.store,
                    "Successfully posted to stock status server"
                ),
                Err(e) => tracing::warn!(
                    store = %record.store,
                    "Failed to post to stock status server: {:#}",
                    e
                ),
            }
        });
    }
}
