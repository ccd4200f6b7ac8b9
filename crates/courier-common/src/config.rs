//! ---
//! courier_section: "03-configuration-logging"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Shared configuration and logging utilities."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use courier_queue::QueueConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_producers() -> usize {
    2
}

fn default_messages_per_producer() -> usize {
    1000
}

fn default_requesters() -> usize {
    2
}

fn default_requests_per_requester() -> usize {
    1000
}

/// Top-level configuration for courier binaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub bench: BenchConfig,
}

/// A [`CourierConfig`] together with the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedCourierConfig {
    pub config: CourierConfig,
    pub source: Option<PathBuf>,
}

impl CourierConfig {
    pub const ENV_CONFIG_PATH: &str = "COURIER_CONFIG";

    /// Load configuration, respecting the `COURIER_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// `COURIER_CONFIG` wins when set; otherwise the first existing candidate
    /// is used. With neither, built-in defaults apply.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedCourierConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedCourierConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedCourierConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!("no configuration file found; using defaults");
        Ok(LoadedCourierConfig {
            config: Self::default(),
            source: None,
        })
    }

    /// Read and validate a single configuration file, ignoring `COURIER_CONFIG`.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<CourierConfig>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.queue.validate()?;
        self.bench.validate()?;
        Ok(())
    }

    /// Render as TOML, e.g. for `courierctl config show`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to render configuration")
    }
}

impl std::str::FromStr for CourierConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: CourierConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Also write a daily-rolling JSON log file under `directory`.
    #[serde(default)]
    pub file_enabled: bool,
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            file_enabled: false,
            directory: default_logging_directory(),
            file_prefix: None,
        }
    }
}

/// Workload sizes for the `courierctl` load scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default = "default_producers")]
    pub producers: usize,
    #[serde(default = "default_messages_per_producer")]
    pub messages_per_producer: usize,
    #[serde(default = "default_requesters")]
    pub requesters: usize,
    #[serde(default = "default_requests_per_requester")]
    pub requests_per_requester: usize,
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.producers == 0 {
            return Err(anyhow!("bench.producers must be at least 1"));
        }
        if self.requesters == 0 {
            return Err(anyhow!("bench.requesters must be at least 1"));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            producers: default_producers(),
            messages_per_producer: default_messages_per_producer(),
            requesters: default_requesters(),
            requests_per_requester: default_requests_per_requester(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: CourierConfig = "".parse().expect("parse empty config");
        assert_eq!(config, CourierConfig::default());
        assert_eq!(config.queue.name, "queue");
        assert_eq!(config.logging.format, LogFormat::StructuredJson);
    }

    #[test]
    fn sections_override_defaults() {
        let config: CourierConfig = r#"
            [queue]
            name = "bus"
            request_timeout_ms = 500

            [logging]
            format = "pretty"

            [bench]
            producers = 4
            "#
        .parse()
        .expect("parse config");

        assert_eq!(config.queue.name, "bus");
        assert_eq!(config.queue.request_timeout, Duration::from_millis(500));
        assert_eq!(config.queue.get_timeout, Duration::ZERO);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.bench.producers, 4);
        assert_eq!(config.bench.requesters, 2);
    }

    #[test]
    fn zero_producers_is_rejected() {
        let err = "[bench]\nproducers = 0\n"
            .parse::<CourierConfig>()
            .expect_err("zero producers invalid");
        assert!(err.to_string().contains("producers"));
    }

    #[test]
    fn empty_queue_name_is_rejected() {
        assert!("[queue]\nname = \"\"\n".parse::<CourierConfig>().is_err());
    }

    #[test]
    fn rendered_toml_parses_back() {
        let mut config = CourierConfig::default();
        config.queue.get_timeout = Duration::from_millis(75);
        config.bench.requesters = 3;
        let rendered = config.to_toml().expect("render");
        let parsed: CourierConfig = rendered.parse().expect("parse rendered");
        assert_eq!(parsed, config);
    }
}
