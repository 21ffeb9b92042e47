//! Parameter snapshot and restoration
//!
//! A sweep rewrites one user parameter many times. [`ParameterStateGuard`]
//! records the parameter's expression before the first write and puts it
//! back when the sweep ends, whichever way it ends.

use crate::adapters::host::DesignHost;
use crate::core::recompute::{RecomputeReport, RecomputeWaiter};
use crate::domain::ids::ParameterName;
use crate::domain::{Result, SweepError};
use chrono::{DateTime, Utc};

/// Parameter expression captured before a sweep
///
/// Used only to restore the design; never written to any export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSnapshot {
    /// Parameter the snapshot belongs to
    pub parameter: ParameterName,

    /// Expression at capture time
    pub original_expression: String,

    /// Capture time
    pub captured_at: DateTime<Utc>,
}

/// Holds a parameter's original expression until it is restored
///
/// [`ParameterStateGuard::release`] consumes the guard, so a parameter is
/// restored at most once per acquisition. A guard dropped without release
/// logs an error: the design is left modified.
#[derive(Debug)]
pub struct ParameterStateGuard {
    snapshot: ParameterSnapshot,
    released: bool,
}

impl ParameterStateGuard {
    /// Capture the current expression of `parameter`
    ///
    /// # Errors
    ///
    /// Returns the host's error if the parameter does not exist.
    pub fn acquire(host: &dyn DesignHost, parameter: &ParameterName) -> Result<Self> {
        let original_expression = host.parameter_expression(parameter.as_str())?;

        tracing::debug!(
            parameter = %parameter,
            expression = %original_expression,
            "Captured parameter snapshot"
        );

        Ok(Self {
            snapshot: ParameterSnapshot {
                parameter: parameter.clone(),
                original_expression,
                captured_at: Utc::now(),
            },
            released: false,
        })
    }

    /// The captured snapshot
    pub fn snapshot(&self) -> &ParameterSnapshot {
        &self.snapshot
    }

    /// Write the original expression back and regenerate once
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the original expression. A failed
    /// regeneration after the write is tolerated like any other.
    pub async fn release(
        mut self,
        host: &mut dyn DesignHost,
        waiter: &RecomputeWaiter,
    ) -> Result<RecomputeReport> {
        self.released = true;
        let parameter = self.snapshot.parameter.as_str();

        host.set_parameter_expression(parameter, &self.snapshot.original_expression)
            .map_err(|e| {
                tracing::error!(
                    parameter = %parameter,
                    expression = %self.snapshot.original_expression,
                    error = %e,
                    "Failed to restore parameter"
                );
                SweepError::Parameter(format!(
                    "Failed to restore '{}' to {}: {e}",
                    parameter, self.snapshot.original_expression
                ))
            })?;

        let report = waiter.regenerate(host).await;

        tracing::info!(
            parameter = %parameter,
            expression = %self.snapshot.original_expression,
            "Restored parameter"
        );

        Ok(report)
    }
}

impl Drop for ParameterStateGuard {
    fn drop(&mut self) {
        if !self.released {
            tracing::error!(
                parameter = %self.snapshot.parameter,
                expression = %self.snapshot.original_expression,
                "Parameter guard dropped without restoring the original expression"
            );
        }
    }
}
