//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output with configurable level
//! - Optional JSON log files with rotation
//! - Helper macros for the recurring sweep events
//!
//! # Example
//!
//! ```no_run
//! use paramsweep::config::LoggingConfig;
//! use paramsweep::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(parameter = "label", "Sweep requested");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, parse_rotation, LoggingGuard};

/// Log the start of a sweep
///
/// Takes an [`ExportJob`](crate::domain::ExportJob).
#[macro_export]
macro_rules! log_sweep_start {
    ($job:expr) => {
        tracing::info!(
            parameter = %$job.parameter_name,
            variations = $job.variations.len(),
            targets = $job.targets.len(),
            total = $job.total_operations(),
            format = %$job.format,
            output = %$job.output_folder.display(),
            "Starting sweep"
        );
    };
}

/// Log sweep progress
///
/// # Example
///
/// ```no_run
/// use paramsweep::log_sweep_progress;
///
/// log_sweep_progress!(3, 12);
/// ```
#[macro_export]
macro_rules! log_sweep_progress {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = if $total == 0 {
                100.0
            } else {
                $current as f64 / $total as f64 * 100.0
            },
            "Sweep progress"
        );
    };
}

/// Log an export that produced no file
///
/// # Example
///
/// ```no_run
/// use paramsweep::log_unit_failure;
///
/// log_unit_failure!("Red", "Case", "target has no geometry: Case");
/// ```
#[macro_export]
macro_rules! log_unit_failure {
    ($variation:expr, $target:expr, $reason:expr) => {
        tracing::warn!(
            variation = %$variation,
            target = %$target,
            reason = %$reason,
            "Export failed"
        );
    };
}

/// Log the completion of a sweep
///
/// Takes a [`SweepSummary`](crate::core::export::SweepSummary).
#[macro_export]
macro_rules! log_sweep_complete {
    ($summary:expr) => {
        tracing::info!(
            run_id = %$summary.run_id,
            parameter = %$summary.parameter,
            total = $summary.total_operations,
            succeeded = $summary.succeeded,
            failed = $summary.failed,
            not_attempted = $summary.not_attempted(),
            regeneration_failures = $summary.regeneration_failures,
            cancelled = $summary.cancelled,
            restored = $summary.restored,
            duration_ms = $summary.duration.as_millis() as u64,
            "Sweep completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use paramsweep::domain::SweepError;
/// use paramsweep::log_error_with_context;
///
/// let error = SweepError::Configuration("No variations entered".to_string());
/// log_error_with_context!(&error, "Failed to prepare sweep");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
