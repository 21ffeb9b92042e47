//! Domain error types
//!
//! This module defines the error hierarchy for paramsweep. Sweep-level errors
//! ([`SweepError`]) abort a command; per-unit export failures
//! ([`ExportFailure`]) are recorded against a single (variation, target) pair
//! and never stop a sweep.

use std::path::PathBuf;
use thiserror::Error;

/// Main paramsweep error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Configuration-related errors (invalid job, missing folder, empty lists)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors for individual values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parameter lookup or update errors
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// Document loading or structure errors
    #[error("Document error: {0}")]
    Document(String),

    /// Model regeneration errors
    #[error("Regeneration error: {0}")]
    Regeneration(String),

    /// Export backend errors surfaced outside the per-unit accounting
    #[error("Export error: {0}")]
    Export(#[from] ExportFailure),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl SweepError {
    /// Whether the error was raised while preparing a sweep, before any
    /// parameter was touched
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SweepError::Configuration(_) | SweepError::Validation(_) | SweepError::Parameter(_)
        )
    }
}

/// Failure of a single export call
///
/// Backends return this for one (variation, target) unit. The coordinator
/// records it and moves on to the next unit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportFailure {
    /// The backend cannot write the requested format
    #[error("format not supported by this backend: {0}")]
    UnsupportedFormat(String),

    /// The target handle does not resolve to an object in the document
    #[error("invalid export target: {0}")]
    InvalidTarget(String),

    /// The target has no geometry to write
    #[error("target has no geometry: {0}")]
    EmptyGeometry(String),

    /// Filesystem error while writing the output
    #[error("failed to write {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Any other backend-specific error
    #[error("backend error: {0}")]
    Backend(String),
}

impl ExportFailure {
    /// Build an I/O failure for `path`
    pub fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ExportFailure::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SweepError {
    fn from(err: std::io::Error) -> Self {
        SweepError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        SweepError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SweepError {
    fn from(err: toml::de::Error) -> Self {
        SweepError::Configuration(format!("TOML parse error: {err}"))
    }
}
