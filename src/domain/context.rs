//! Error context extension trait
//!
//! `.context()` and `.with_context()` for `Result<T, E: Into<SweepError>>`,
//! in the spirit of `anyhow::Context`. Unlike anyhow, the error keeps its
//! [`SweepError`] variant, so callers can still tell a configuration problem
//! from an I/O problem after context has been added.
//!
//! ```rust
//! use paramsweep::domain::context::ResultExt;
//! use paramsweep::domain::Result;
//!
//! fn read_model(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read model {path}"))
//! }
//! ```

use crate::domain::errors::SweepError;
use crate::domain::result::Result;
use std::fmt::Display;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error, computing it only on the error path
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SweepError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| prefix(e.into(), &context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| prefix(e.into(), &f()))
    }
}

fn prefix(error: SweepError, context: &dyn Display) -> SweepError {
    match error {
        SweepError::Configuration(m) => SweepError::Configuration(format!("{context}: {m}")),
        SweepError::Validation(m) => SweepError::Validation(format!("{context}: {m}")),
        SweepError::Parameter(m) => SweepError::Parameter(format!("{context}: {m}")),
        SweepError::Document(m) => SweepError::Document(format!("{context}: {m}")),
        SweepError::Regeneration(m) => SweepError::Regeneration(format!("{context}: {m}")),
        SweepError::Serialization(m) => SweepError::Serialization(format!("{context}: {m}")),
        SweepError::Io(m) => SweepError::Io(format!("{context}: {m}")),
        other @ (SweepError::Export(_) | SweepError::Other(_)) => {
            SweepError::Other(format!("{context}: {other}"))
        }
    }
}
