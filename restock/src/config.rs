use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::time::Duration;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_INGEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

// Parses a duration string (e.g., "5s", "1m") into a `tokio::time::Duration`.
// Used for deserializing duration values from the config file.
fn parse_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Stock-status ingestion endpoint settings.
/// Corresponds to the [ingest] section in the TOML config file.
#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    // Base URL the `/stock` and `/stock/bulk` paths are appended to.
    pub base_url: Option<String>,

    // Request timeout for a single push.
    #[serde(
        default = "IngestConfig::default_timeout",
        deserialize_with = "parse_duration"
    )]
    pub timeout: Duration,

    // How long the binary waits for in-flight pushes before exiting.
    #[serde(
        default = "IngestConfig::default_shutdown_grace",
        deserialize_with = "parse_duration"
    )]
    pub shutdown_grace: Duration,
}

impl IngestConfig {
    fn default_timeout() -> Duration {
        DEFAULT_INGEST_TIMEOUT
    }

    fn default_shutdown_grace() -> Duration {
        DEFAULT_SHUTDOWN_GRACE
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Self::default_timeout(),
            shutdown_grace: Self::default_shutdown_grace(),
        }
    }
}

/// Represents the overall application configuration, loaded from a TOML file.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Minimum log level, in `EnvFilter` directive syntax.
    #[serde(default = "Config::default_log_level")]
    pub log_level: String,

    // Render identity strings and outcomes with ANSI colors.
    #[serde(default)]
    pub color: bool,

    #[serde(default)]
    pub ingest: IngestConfig,
}

impl Config {
    pub fn new(config_path: &Path) -> Result<Self> {
        Self::load_from_file(config_path)
    }

    fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)?;
        toml::from_str::<Config>(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    /// Replaces the ingestion base URL when one is supplied from outside the file.
    pub fn with_ingest_url(mut self, base_url: Option<String>) -> Self {
        if base_url.is_some() {
            self.ingest.base_url = base_url;
        }
        self
    }

    fn default_log_level() -> String {
        DEFAULT_LOG_LEVEL.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            color: false,
            ingest: IngestConfig::default(),
        }
    }
}
