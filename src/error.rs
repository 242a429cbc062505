//! Error types for SlotInfo
//!
//! Two layers of errors live here. [`SlotInfoError`] describes failures of the
//! I/O seams (reading an ad file, running a query command). [`FieldError`]
//! describes why a single field of a job record ended up absent; it is stored
//! in the record itself instead of being propagated.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SlotInfo operations
#[derive(Error, Debug)]
pub enum SlotInfoError {
    /// I/O error while reading a scheduler file
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Query command could not be started
    #[error("Failed to run '{program}': {source}")]
    CommandSpawn {
        /// Program that was run
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Query command exited with a non-zero status
    #[error("'{program}' exited with {status}: {stderr}")]
    CommandFailed {
        /// Program that was run
        program: String,
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Query command succeeded but printed nothing
    #[error("'{program}' produced no output")]
    EmptyOutput {
        /// Program that was run
        program: String,
    },

    /// Required environment variable is not set
    #[error("Environment variable {0} is not set")]
    MissingVariable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SlotInfoError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a spawn error for a query command
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandSpawn {
            program: program.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for SlotInfo operations
pub type Result<T> = std::result::Result<T, SlotInfoError>;

impl From<serde_json::Error> for SlotInfoError {
    fn from(err: serde_json::Error) -> Self {
        SlotInfoError::Serialization(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SlotInfoError::io(path, e))
    }
}

/// Reason a single record field is absent
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FieldError {
    /// The scheduler never reports this field
    #[error("not provided by this scheduler")]
    NotProvided,

    /// The ad file or query command could not be read
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source was read but the key was not in it
    #[error("key '{0}' not found")]
    MissingKey(String),

    /// The key was found but its value has the wrong format
    #[error("cannot parse {key}='{value}' as {expected}")]
    Unparseable {
        /// Key that was looked up
        key: String,
        /// Raw value found
        value: String,
        /// Format the value should have had
        expected: &'static str,
    },
}

impl FieldError {
    /// Create an unparseable-value error
    pub fn unparseable(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::Unparseable {
            key: key.into(),
            value: value.into(),
            expected,
        }
    }

    /// Wrap a source-level failure as the absence reason of a field
    pub fn unavailable(err: &SlotInfoError) -> Self {
        Self::SourceUnavailable(err.to_string())
    }
}

/// Result of extracting a single field
pub type FieldResult<T> = std::result::Result<T, FieldError>;
