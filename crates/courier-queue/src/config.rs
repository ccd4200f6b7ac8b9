//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Queue engine with FIFO delivery and request correlation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

use crate::error::ConfigError;

/// Settings applied when a queue is built from configuration.
///
/// A zero timeout means "wait indefinitely".
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Label attached to every log event emitted by the queue.
    #[serde(default = "QueueConfig::default_name")]
    pub name: String,
    /// Timeout used by [`Queue::get_default`](crate::Queue::get_default).
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default, rename = "get_timeout_ms")]
    pub get_timeout: Duration,
    /// Timeout used by [`Queue::request_default`](crate::Queue::request_default).
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default, rename = "request_timeout_ms")]
    pub request_timeout: Duration,
}

impl QueueConfig {
    fn default_name() -> String {
        "queue".to_owned()
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            get_timeout: Duration::ZERO,
            request_timeout: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_yields_defaults() {
        let config: QueueConfig = toml::from_str("").expect("parse empty table");
        assert_eq!(config, QueueConfig::default());
    }

    #[test]
    fn timeouts_are_read_as_milliseconds() {
        let config: QueueConfig = toml::from_str(
            r#"
            name = "bus"
            get_timeout_ms = 250
            request_timeout_ms = 1500
            "#,
        )
        .expect("parse queue config");
        assert_eq!(config.name, "bus");
        assert_eq!(config.get_timeout, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn blank_name_is_rejected() {
        let config = QueueConfig {
            name: "  ".into(),
            ..QueueConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyName));
        assert!(QueueConfig::default().validate().is_ok());
    }
}
