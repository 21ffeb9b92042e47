//! Terminal progress reporting
//!
//! Prints one line per export and reads cancellation from the shutdown
//! channel fed by the signal handler.

use crate::adapters::host::ProgressReporter;
use tokio::sync::watch;

/// Progress reporter for the terminal
pub struct ConsoleProgress {
    cancel: watch::Receiver<bool>,
}

impl ConsoleProgress {
    /// Create a reporter cancelled when `cancel` becomes `true`
    pub fn new(cancel: watch::Receiver<bool>) -> Self {
        Self { cancel }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&mut self, current: usize, total: usize, message: &str) {
        println!("  [{current}/{total}] {message}");
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_follows_channel() {
        let (tx, rx) = watch::channel(false);
        let progress = ConsoleProgress::new(rx);

        assert!(!progress.is_cancelled());
        tx.send(true).unwrap();
        assert!(progress.is_cancelled());
    }
}
