//! Event reporting for a product-availability monitor.
//!
//! Monitoring outcomes (stock found or lost, blocked by anti-bot defenses,
//! rate limited, over the price limit, ...) are rendered into log lines by a
//! [`Reporter`]. Stock transitions are also pushed, fire-and-forget, to a
//! stock-status ingestion endpoint through a [`StockPublisher`].
pub mod config;
pub mod identity;
pub mod logger;
pub mod model;
pub mod outcome;
pub mod publisher;
pub mod replay;
pub mod reporter;

pub use config::Config;
pub use model::{Link, StockStatus, Store};
pub use outcome::Outcome;
pub use publisher::{HttpPublisher, IngestRoute, StockPublisher};
pub use reporter::Reporter;
