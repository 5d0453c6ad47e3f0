//! Configuration for the macsight exporter.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::runner::SourceId;

pub use macsight_common::{LogFormat, LoggingConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// HTTP endpoint settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Which data sources run on each scrape.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address to listen on (default: "0.0.0.0:9127").
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Path for metrics endpoint (default: "/metrics").
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_listen() -> String {
    "0.0.0.0:9127".to_string()
}

fn default_path() -> String {
    "/metrics".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
        }
    }
}

/// Per-source settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Whether the source runs (default: true once the block is present).
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Kill the command after this many seconds (default: per source).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            timeout_secs: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            timeout_secs: None,
        }
    }

    /// Effective timeout for `id`.
    pub fn timeout(&self, id: SourceId) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| id.default_timeout())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::enabled()
    }
}

/// Data source selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub powermetrics: SourceConfig,

    #[serde(default)]
    pub vmstat: SourceConfig,

    /// Off unless configured; `macmon` is a third-party tool.
    #[serde(default = "SourceConfig::disabled")]
    pub macmon: SourceConfig,
}

impl SourcesConfig {
    pub fn get(&self, id: SourceId) -> &SourceConfig {
        match id {
            SourceId::Powermetrics => &self.powermetrics,
            SourceId::VmStat => &self.vmstat,
            SourceId::Macmon => &self.macmon,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            powermetrics: SourceConfig::enabled(),
            vmstat: SourceConfig::enabled(),
            macmon: SourceConfig::disabled(),
        }
    }
}

impl ExporterConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig = json5::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate listen address format
        if self.http.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid listen address: {}",
                self.http.listen
            )));
        }

        // Validate path starts with /
        if !self.http.path.starts_with('/') {
            return Err(ConfigError::Validation(
                "Metrics path must start with /".to_string(),
            ));
        }

        if self.http.path == "/health" {
            return Err(ConfigError::Validation(
                "Metrics path must not be /health".to_string(),
            ));
        }

        for id in SourceId::ALL {
            let Some(secs) = self.sources.get(id).timeout_secs else {
                continue;
            };

            if secs == 0 {
                return Err(ConfigError::Validation(format!(
                    "{id} timeout_secs must be > 0"
                )));
            }

            let window = id.sample_window();
            if Duration::from_secs(secs) < window {
                return Err(ConfigError::Validation(format!(
                    "{id} timeout_secs must be at least {}s, its sample window",
                    window.as_secs()
                )));
            }
        }

        if !SourceId::ALL.iter().any(|id| self.sources.get(*id).enabled) {
            return Err(ConfigError::Validation(
                "At least one source must be enabled".to_string(),
            ));
        }

        Ok(())
    }
}
