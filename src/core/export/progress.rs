//! Sweep progress and cooperative cancellation

use crate::adapters::host::ProgressReporter;

/// Counts exports and polls for cancellation
///
/// The coordinator polls [`ProgressTracker::is_cancelled`] before each
/// variation and before each export. Once cancellation is observed it stays
/// observed for the rest of the sweep.
pub struct ProgressTracker<'a> {
    reporter: &'a mut dyn ProgressReporter,
    total: usize,
    current: usize,
    message: String,
    cancelled: bool,
}

impl<'a> ProgressTracker<'a> {
    /// Create a tracker for `total` planned exports
    pub fn new(reporter: &'a mut dyn ProgressReporter, total: usize) -> Self {
        Self {
            reporter,
            total,
            current: 0,
            message: String::new(),
            cancelled: false,
        }
    }

    /// Planned exports
    pub fn total(&self) -> usize {
        self.total
    }

    /// Exports started so far, including skipped ones
    pub fn current(&self) -> usize {
        self.current
    }

    /// Last status message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the user asked to stop
    pub fn is_cancelled(&mut self) -> bool {
        if !self.cancelled && self.reporter.is_cancelled() {
            tracing::info!(
                current = self.current,
                total = self.total,
                "Cancellation requested"
            );
            self.cancelled = true;
        }
        self.cancelled
    }

    /// Move to the next export and report it
    pub fn advance(&mut self, message: impl Into<String>) {
        self.step(1, message.into());
    }

    /// Move past `count` exports that will not be attempted
    pub fn skip(&mut self, count: usize, message: impl Into<String>) {
        self.step(count, message.into());
    }

    fn step(&mut self, count: usize, message: String) {
        self.current = (self.current + count).min(self.total);
        self.message = message;
        crate::log_sweep_progress!(self.current, self.total);
        self.reporter
            .report(self.current, self.total, &self.message);
    }

}
