//! Error types for the affect subsystem
//!
//! Classification, scoring and template selection never fail: empty text and
//! unknown emotions fall back to neutral defaults. Errors only come from
//! configuration validation, snapshot I/O and corrupt snapshots.

use thiserror::Error;

/// Result alias used throughout the crate
pub type AffectResult<T> = Result<T, AffectError>;

/// Errors surfaced to callers of the affect subsystem
#[derive(Debug, Error)]
pub enum AffectError {
    /// Reading or writing the snapshot medium failed
    #[error("storage operation '{operation}' failed: {source}")]
    Storage {
        /// Operation that failed
        operation: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Encoding a value to JSON failed
    #[error("serialization '{operation}' failed: {source}")]
    Serialization {
        /// Operation that failed
        operation: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Persisted snapshot exists but could not be parsed
    #[error("malformed snapshot at {location}: {source}")]
    MalformedSnapshot {
        /// Path or label of the snapshot
        location: String,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// A value violated a constraint
    #[error("invalid {field}: {constraint} (got {value})")]
    Validation {
        /// Field being validated
        field: String,
        /// Constraint that was violated
        constraint: String,
        /// Offending value
        value: String,
    },

    /// Loading configuration from the environment failed
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AffectError {
    /// Create a storage error
    pub fn storage(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(operation: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            operation: operation.into(),
            source,
        }
    }

    /// Create a malformed snapshot error
    pub fn malformed_snapshot(location: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedSnapshot {
            location: location.into(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
            value: value.into(),
        }
    }

    /// Whether this error reports a corrupt snapshot
    pub fn is_malformed_snapshot(&self) -> bool {
        matches!(self, Self::MalformedSnapshot { .. })
    }
}
