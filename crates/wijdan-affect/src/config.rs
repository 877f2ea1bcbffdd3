//! Configuration for the affect subsystem

use crate::error::{AffectError, AffectResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment prefix used by [`AffectConfig::from_env`]
pub const ENV_PREFIX: &str = "WIJDAN";

/// Tunables for memory, emotion decay and snapshots
///
/// Keyword tables are not part of this struct; they are passed to each
/// component at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectConfig {
    /// Maximum number of turns kept by the memory store
    pub memory_capacity: usize,

    /// Number of most recent turns scanned during retrieval
    pub retrieval_window: usize,

    /// Result limit used when callers do not pass one
    pub default_retrieval_limit: usize,

    /// Lifetime of an emotional event in seconds
    pub event_duration_secs: u64,

    /// Maximum number of emotional events kept in the historical log
    pub event_log_capacity: usize,

    /// Maximum number of composed exchanges remembered for stability and analytics
    pub exchange_log_capacity: usize,

    /// Location of the JSON snapshot file
    pub snapshot_path: PathBuf,

    /// Keep only the most recent N turns in snapshots (`None` keeps all)
    pub snapshot_turn_limit: Option<usize>,
}

impl AffectConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from `WIJDAN_*` environment variables
    pub fn from_env() -> AffectResult<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Load overrides from environment variables with a custom prefix
    pub fn from_env_with_prefix(prefix: &str) -> AffectResult<Self> {
        let loaded: Self = config::Config::builder()
            .add_source(config::Environment::with_prefix(prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Set memory capacity
    pub fn with_memory_capacity(mut self, capacity: usize) -> Self {
        self.memory_capacity = capacity;
        self
    }

    /// Set the retrieval scan window
    pub fn with_retrieval_window(mut self, window: usize) -> Self {
        self.retrieval_window = window;
        self
    }

    /// Set the default retrieval limit
    pub fn with_default_retrieval_limit(mut self, limit: usize) -> Self {
        self.default_retrieval_limit = limit;
        self
    }

    /// Set emotional event duration in seconds
    pub fn with_event_duration_secs(mut self, secs: u64) -> Self {
        self.event_duration_secs = secs;
        self
    }

    /// Set emotional event log capacity
    pub fn with_event_log_capacity(mut self, capacity: usize) -> Self {
        self.event_log_capacity = capacity;
        self
    }

    /// Set exchange log capacity
    pub fn with_exchange_log_capacity(mut self, capacity: usize) -> Self {
        self.exchange_log_capacity = capacity;
        self
    }

    /// Set snapshot path
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// Limit the number of turns written to snapshots
    pub fn with_snapshot_turn_limit(mut self, limit: Option<usize>) -> Self {
        self.snapshot_turn_limit = limit;
        self
    }

    /// Check that every bound is usable
    pub fn validate(&self) -> AffectResult<()> {
        let positive = [
            ("memory_capacity", self.memory_capacity),
            ("retrieval_window", self.retrieval_window),
            ("event_log_capacity", self.event_log_capacity),
            ("exchange_log_capacity", self.exchange_log_capacity),
        ];

        for (field, value) in positive {
            if value == 0 {
                return Err(AffectError::validation(
                    field,
                    "must be at least 1",
                    value.to_string(),
                ));
            }
        }

        if self.event_duration_secs == 0 {
            return Err(AffectError::validation(
                "event_duration_secs",
                "must be at least 1",
                "0",
            ));
        }

        if self.snapshot_path.as_os_str().is_empty() {
            return Err(AffectError::validation(
                "snapshot_path",
                "must not be empty",
                "\"\"",
            ));
        }

        Ok(())
    }
}

impl Default for AffectConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 1000,
            retrieval_window: 50,
            default_retrieval_limit: 5,
            event_duration_secs: 300,
            event_log_capacity: 50,
            exchange_log_capacity: 100,
            snapshot_path: PathBuf::from("wijdan_memory.json"),
            snapshot_turn_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AffectConfig::default();
        assert_eq!(config.memory_capacity, 1000);
        assert_eq!(config.retrieval_window, 50);
        assert_eq!(config.event_duration_secs, 300);
        assert_eq!(config.event_log_capacity, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_and_validation() {
        let config = AffectConfig::new()
            .with_memory_capacity(10)
            .with_retrieval_window(5)
            .with_snapshot_turn_limit(Some(3));
        assert!(config.validate().is_ok());
        assert_eq!(config.snapshot_turn_limit, Some(3));

        let broken = AffectConfig::new().with_memory_capacity(0);
        assert!(matches!(
            broken.validate(),
            Err(AffectError::Validation { ref field, .. }) if field == "memory_capacity"
        ));

        let broken = AffectConfig::new().with_event_duration_secs(0);
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_from_env_with_prefix() {
        std::env::set_var("WIJDANCFGTEST_MEMORY_CAPACITY", "25");
        std::env::set_var("WIJDANCFGTEST_EVENT_DURATION_SECS", "60");

        let config = AffectConfig::from_env_with_prefix("WIJDANCFGTEST").unwrap();

        std::env::remove_var("WIJDANCFGTEST_MEMORY_CAPACITY");
        std::env::remove_var("WIJDANCFGTEST_EVENT_DURATION_SECS");

        assert_eq!(config.memory_capacity, 25);
        assert_eq!(config.event_duration_secs, 60);
        assert_eq!(config.retrieval_window, 50);
    }
}
