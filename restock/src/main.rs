/// Entry point for the restock reporter
///
/// Replays a feed of recorded monitoring outcomes through the reporter,
/// logging each rendered line and pushing stock transitions to the
/// stock-status server.
use anyhow::{Context, Result};
use clap::Parser;
use restock::{Config, Reporter, replay};
use std::path::{Path, PathBuf};

/// Define command line arguments using clap
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", env = "restock_config")]
    config: Option<PathBuf>,

    /// Base URL of the stock-status server, overrides `ingest.base_url`
    #[arg(long, value_name = "URL", env = "STOCK_STATUS_URL")]
    ingest_url: Option<String>,

    /// JSON-lines feed of recorded outcomes
    #[arg(value_name = "FEED")]
    feed: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let conf = match &cli.config {
        Some(path) => match Config::new(path) {
            Ok(conf) => conf,
            Err(e) => {
                eprintln!("Failed to initialize configuration: {:?}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    }
    .with_ingest_url(cli.ingest_url.clone());

    let logger_guard = match restock::logger::init(&conf.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logger: {:?}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("config: {:?}", conf);

    if conf.color {
        colored::control::set_override(true);
    }

    let result = run(&conf, &cli.feed).await;
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }

    // Flushes buffered lines before the process exits.
    drop(logger_guard);

    if result.is_err() {
        std::process::exit(1);
    }
}

/// Replays `feed` and waits out the shutdown grace so in-flight pushes can land.
async fn run(conf: &Config, feed: &Path) -> Result<()> {
    let reporter =
        Reporter::from_config(&conf.ingest).with_context(|| "Failed to create reporter")?;

    let replayed = replay::replay_file(feed, &reporter, conf.color).await;
    if let Ok(summary) = &replayed {
        tracing::info!(
            reported = summary.reported,
            skipped = summary.skipped,
            "Replay complete"
        );
    }

    // Pushes are never awaited by the reporter.
    tokio::time::sleep(conf.ingest.shutdown_grace).await;

    replayed.map(|_| ()).with_context(|| "Replay failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn make_config() -> Config {
        let mut conf = Config::default();
        conf.ingest.shutdown_grace = Duration::from_millis(10);
        conf
    }

    #[tokio::test]
    async fn test_run_returns_error_for_missing_feed() {
        let err = run(&make_config(), Path::new("no_such_feed.jsonl"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Replay failed"));
    }

    #[tokio::test]
    async fn test_run_replays_feed() {
        let mut feed = NamedTempFile::new().expect("Failed to create temp file");
        feed.write_all(
            br#"{"type":"setup","store":{"name":"BestBuy"},"topic":"browser","message":"launched"}"#,
        )
        .expect("Failed to write to temp file");

        assert!(run(&make_config(), feed.path()).await.is_ok());
    }
}
