//! Sweep summary and reporting
//!
//! This module defines the per-unit outcome of an export call and the
//! structures that aggregate them into the final tally.

use crate::domain::errors::ExportFailure;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Result of one (variation, target) export
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOutcome {
    /// Index into the job's variations
    pub variation_index: usize,

    /// Index into the job's targets
    pub target_index: usize,

    /// Output path
    pub path: PathBuf,

    /// Export result
    pub result: Result<(), ExportFailure>,
}

impl UnitOutcome {
    /// Whether the export succeeded
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A unit that did not produce a file
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFailure {
    /// Variation value
    pub variation: String,

    /// Target display name
    pub target: String,

    /// Planned output path
    pub path: PathBuf,

    /// Why the unit failed
    pub reason: String,
}

/// Final tally handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Planned exports: variations × targets
    pub total_operations: usize,

    /// Exports that wrote a file
    pub succeeded: usize,

    /// The user stopped the sweep early
    pub cancelled: bool,
}

/// Summary of a sweep
#[derive(Debug, Clone)]
pub struct SweepSummary {
    /// Identifier of this run, also attached to its log span
    pub run_id: Uuid,

    /// Parameter that was swept
    pub parameter: String,

    /// Planned exports: variations × targets
    pub total_operations: usize,

    /// Exports that wrote a file
    pub succeeded: usize,

    /// Exports that were attempted or skipped and produced no file
    pub failed: usize,

    /// Variations whose regeneration reported an error
    pub regeneration_failures: usize,

    /// The user stopped the sweep early
    pub cancelled: bool,

    /// The parameter was written back to its original expression
    pub restored: bool,

    /// Files written, in sweep order
    pub exported_files: Vec<PathBuf>,

    /// Units that produced no file
    pub failures: Vec<UnitFailure>,

    /// Start time
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration
    pub duration: Duration,
}

impl SweepSummary {
    /// Create an empty summary for a run
    pub fn new(run_id: Uuid, parameter: impl Into<String>, total_operations: usize) -> Self {
        Self {
            run_id,
            parameter: parameter.into(),
            total_operations,
            succeeded: 0,
            failed: 0,
            regeneration_failures: 0,
            cancelled: false,
            restored: false,
            exported_files: Vec::new(),
            failures: Vec::new(),
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record the outcome of one export
    pub fn record(&mut self, outcome: UnitOutcome, variation: &str, target: &str) {
        match outcome.result {
            Ok(()) => {
                self.succeeded += 1;
                self.exported_files.push(outcome.path);
            }
            Err(failure) => self.record_failure(UnitFailure {
                variation: variation.to_string(),
                target: target.to_string(),
                path: outcome.path,
                reason: failure.to_string(),
            }),
        }
    }

    /// Record a unit that produced no file
    pub fn record_failure(&mut self, failure: UnitFailure) {
        crate::log_unit_failure!(failure.variation, failure.target, failure.reason);
        self.failed += 1;
        self.failures.push(failure);
    }

    /// Exports never attempted because of cancellation
    pub fn not_attempted(&self) -> usize {
        self.total_operations
            .saturating_sub(self.succeeded + self.failed)
    }

    /// The tally the caller reports to the user
    pub fn outcome(&self) -> SweepOutcome {
        SweepOutcome {
            total_operations: self.total_operations,
            succeeded: self.succeeded,
            cancelled: self.cancelled,
        }
    }

    /// Whether every planned export wrote a file
    pub fn is_successful(&self) -> bool {
        !self.cancelled && self.succeeded == self.total_operations
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_operations == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.total_operations as f64) * 100.0
    }

    /// One-line report for the user
    pub fn final_message(&self) -> String {
        format!(
            "Exported {} of {} files",
            self.succeeded, self.total_operations
        )
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_sweep_complete!(self);

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Sweep completed with failed exports"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total: usize) -> SweepSummary {
        SweepSummary::new(Uuid::new_v4(), "label", total)
    }

    #[test]
    fn test_summary_creation() {
        let summary = summary(6);

        assert_eq!(summary.total_operations, 6);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
        assert!(!summary.cancelled);
        assert!(!summary.restored);
        assert!(summary.failures.is_empty());
        assert_eq!(summary.duration, Duration::from_secs(0));
    }

    #[test]
    fn test_record_success_and_failure() {
        let mut summary = summary(2);
        summary.record(
            UnitOutcome {
                variation_index: 0,
                target_index: 0,
                path: PathBuf::from("/out/Red.stl"),
                result: Ok(()),
            },
            "Red",
            "Case",
        );
        summary.record(
            UnitOutcome {
                variation_index: 1,
                target_index: 0,
                path: PathBuf::from("/out/Blue.stl"),
                result: Err(ExportFailure::EmptyGeometry("Case".to_string())),
            },
            "Blue",
            "Case",
        );

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exported_files, vec![PathBuf::from("/out/Red.stl")]);
        assert_eq!(summary.failures[0].variation, "Blue");
        assert!(summary.failures[0].reason.contains("no geometry"));
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_not_attempted_counts_cancelled_units() {
        let mut summary = summary(6);
        summary.succeeded = 2;
        summary.failed = 1;
        summary.cancelled = true;

        assert_eq!(summary.not_attempted(), 3);
        assert_eq!(
            summary.outcome(),
            SweepOutcome {
                total_operations: 6,
                succeeded: 2,
                cancelled: true
            }
        );
    }

    #[test]
    fn test_success_rate() {
        let mut summary = summary(4);
        summary.succeeded = 3;
        assert_eq!(summary.success_rate(), 75.0);

        let empty = SweepSummary::new(Uuid::new_v4(), "label", 0);
        assert_eq!(empty.success_rate(), 100.0);
    }

    #[test]
    fn test_final_message() {
        let mut summary = summary(2);
        summary.succeeded = 2;
        assert_eq!(summary.final_message(), "Exported 2 of 2 files");
        assert!(summary.is_successful());
    }
}
