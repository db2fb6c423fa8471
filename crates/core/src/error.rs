//! Error types for the pact ledger
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the pact ledger
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (config file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A component, version, publication or content does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: &'static str,
        /// Identifier used for the lookup
        key: String,
    },

    /// Two revisions raced for the same revision slot
    ///
    /// The second committer loses. Callers retry.
    #[error("Revision conflict: revision {revision} of {provider} for consumer version {consumer_version} already exists")]
    Conflict {
        /// Consumer version number of the pair
        consumer_version: String,
        /// Provider name of the pair
        provider: String,
        /// Revision number that was already taken
        revision: u32,
    },

    /// Contract content could not be created
    #[error("Content creation failed: {0}")]
    ContentCreation(String),

    /// Caller supplied an invalid argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid operation or state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a `NotFound` error
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Build a `Conflict` error
    pub fn conflict(
        consumer_version: impl Into<String>,
        provider: impl Into<String>,
        revision: u32,
    ) -> Self {
        Error::Conflict {
            consumer_version: consumer_version.into(),
            provider: provider.into(),
            revision,
        }
    }

    /// Build an `InvalidInput` error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Build a `Config` error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True for `Conflict`
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Whether retrying the same operation may succeed
    ///
    /// Only revision conflicts are transient.
    pub fn is_retryable(&self) -> bool {
        self.is_conflict()
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
