/// Replay of recorded monitoring outcomes
///
/// A feed is a JSON-lines file. Each entry is either a product outcome or a
/// setup message; each is rendered through the [`Reporter`] and logged.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    model::{Link, Store},
    outcome::{Decoration, Outcome},
    reporter::Reporter,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    Product {
        link: Link,
        store: Store,
        outcome: Outcome,
    },
    Setup {
        store: Store,
        topic: String,
        message: String,
    },
}

/// Counts of a finished replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub reported: usize,
    pub skipped: usize,
}

impl Entry {
    /// Renders the entry and writes it to the log at the level matching its outcome.
    pub fn emit(&self, reporter: &Reporter, color: bool) -> String {
        match self {
            Entry::Product {
                link,
                store,
                outcome,
            } => {
                let line = reporter.report(link, store, outcome, color);
                match outcome.decoration() {
                    Decoration::Failure if !matches!(outcome, Outcome::OutOfStock { .. }) => {
                        tracing::warn!("{}", line)
                    }
                    _ => tracing::info!("{}", line),
                }
                line
            }
            Entry::Setup {
                store,
                topic,
                message,
            } => {
                let line = reporter.message(message, topic, store, color);
                tracing::info!("{}", line);
                line
            }
        }
    }
}

/// Reports every entry of the feed at `path`. Malformed lines are logged and skipped.
pub async fn replay_file(path: &Path, reporter: &Reporter, color: bool) -> Result<ReplaySummary> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open feed: {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();
    let mut summary = ReplaySummary::default();
    let mut line_no = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("Failed to read feed: {}", path.display()))?
    {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match serde_json::from_str::<Entry>(trimmed) {
            Ok(entry) => {
                entry.emit(reporter, color);
                summary.reported += 1;
            }
            Err(e) => {
                tracing::warn!(line = line_no, "Skipping malformed feed entry: {}", e);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::{IngestRoute, MockStockPublisher};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn create_temp_feed(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    #[test]
    fn test_entry_deserializes() {
        let entry: Entry = serde_json::from_str(
            r#"{"type":"setup","store":{"name":"Newegg"},"topic":"proxy","message":"rotating"}"#,
        )
        .unwrap();

        assert_eq!(
            entry,
            Entry::Setup {
                store: Store {
                    name: "Newegg".to_string(),
                    ..Default::default()
                },
                topic: "proxy".to_string(),
                message: "rotating".to_string(),
            }
        );
    }

    #[test]
    fn test_emit_returns_rendered_line() {
        let reporter = Reporter::new(Arc::new(MockStockPublisher::new()));
        let entry: Entry = serde_json::from_str(
            r#"{"type":"product","link":{"brand":"Sony","series":"ps5","model":"Digital"},"store":{"name":"Target"},"outcome":{"kind":"captcha"}}"#,
        )
        .unwrap();

        assert_eq!(
            entry.emit(&reporter, false),
            "✖ [Target] [Sony (ps5)] Digital :: CAPTCHA"
        );
    }

    #[tokio::test]
    async fn test_replay_file_counts_and_pushes() {
        let feed = create_temp_feed(
            r#"# recorded sweep
{"type":"product","link":{"brand":"Nvidia","series":"RTX","model":"4090","url":"https://bb.example/4090","price":1599},"store":{"name":"BestBuy"},"outcome":{"kind":"in_stock","sms":true}}
{"type":"product","link":{"brand":"Nvidia","series":"RTX","model":"4080"},"store":{"name":"BestBuy","bulk":true},"outcome":{"kind":"out_of_stock","meta":"sweep-1"}}

not json at all
{"type":"setup","store":{"name":"BestBuy"},"topic":"browser","message":"launched"}
"#,
        );

        let mut publisher = MockStockPublisher::new();
        publisher
            .expect_publish()
            .withf(|route, record| *route == IngestRoute::Stock && record.name == "4090")
            .times(1)
            .return_const(());
        publisher
            .expect_publish()
            .withf(|route, record| *route == IngestRoute::Bulk && record.name == "4080")
            .times(1)
            .return_const(());
        let reporter = Reporter::new(Arc::new(publisher));

        let summary = replay_file(feed.path(), &reporter, false).await.unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                reported: 3,
                skipped: 1
            }
        );
    }

    #[tokio::test]
    async fn test_replay_missing_file() {
        let reporter = Reporter::new(Arc::new(MockStockPublisher::new()));
        let err = replay_file(Path::new("no_such_feed.jsonl"), &reporter, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open feed"));
    }
}
