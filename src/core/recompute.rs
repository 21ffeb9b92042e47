//! Regeneration after a parameter change
//!
//! [`RecomputeWaiter`] triggers a full regeneration and then pumps the host's
//! event queue until the queued work has drained, so exports see the
//! current geometry.

use crate::adapters::host::DesignHost;

/// Default bound on event-queue rounds per regeneration
pub const DEFAULT_EVENT_ROUNDS: usize = 100;

/// What happened during one regeneration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputeReport {
    /// `compute_all` returned without error
    pub regenerated: bool,

    /// Event rounds pumped
    pub rounds: usize,

    /// The host reported an empty queue before the round bound was hit
    pub drained: bool,
}

/// Triggers regeneration and waits for it to settle
#[derive(Debug, Clone, Copy)]
pub struct RecomputeWaiter {
    max_rounds: usize,
}

impl Default for RecomputeWaiter {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_ROUNDS)
    }
}

impl RecomputeWaiter {
    /// Create a waiter pumping at most `max_rounds` event rounds
    pub fn new(max_rounds: usize) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
        }
    }

    /// Maximum event rounds per regeneration
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Regenerate the design and wait for the host to go idle
    ///
    /// A failed regeneration is logged and tolerated: the caller proceeds
    /// with whatever geometry the host now holds. Events are still pumped so
    /// partial work queued by the failed pass can settle.
    pub async fn regenerate(&self, host: &mut dyn DesignHost) -> RecomputeReport {
        let regenerated = match host.compute_all().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Regeneration failed, continuing with current geometry");
                false
            }
        };

        let mut rounds = 0;
        let mut drained = false;
        while rounds < self.max_rounds {
            let pending = host.process_events().await;
            rounds += 1;
            tokio::task::yield_now().await;
            if !pending {
                drained = true;
                break;
            }
        }

        if !drained {
            tracing::warn!(
                rounds,
                "Host still busy after event round limit, exporting current geometry"
            );
        }

        tracing::debug!(regenerated, rounds, drained, "Regeneration settled");

        RecomputeReport {
            regenerated,
            rounds,
            drained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::host::ObjectInfo;
    use crate::domain::{Result, SweepError};
    use async_trait::async_trait;

    struct QueueHost {
        fail_compute: bool,
        queued: usize,
        pumped: usize,
    }

    #[async_trait]
    impl DesignHost for QueueHost {
        fn parameter_expression(&self, _name: &str) -> Result<String> {
            Ok("1".to_string())
        }

        fn set_parameter_expression(&mut self, _name: &str, _expression: &str) -> Result<()> {
            Ok(())
        }

        async fn compute_all(&mut self) -> Result<()> {
            self.queued = 3;
            if self.fail_compute {
                return Err(SweepError::Regeneration("bad expression".to_string()));
            }
            Ok(())
        }

        async fn process_events(&mut self) -> bool {
            self.pumped += 1;
            self.queued = self.queued.saturating_sub(1);
            self.queued > 0
        }

        fn refresh_viewport(&mut self) {}

        fn bodies(&self) -> Vec<ObjectInfo> {
            Vec::new()
        }

        fn components(&self) -> Vec<ObjectInfo> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_waits_until_queue_drains() {
        let mut host = QueueHost {
            fail_compute: false,
            queued: 0,
            pumped: 0,
        };
        let report = RecomputeWaiter::default().regenerate(&mut host).await;

        assert!(report.regenerated);
        assert!(report.drained);
        assert_eq!(report.rounds, 3);
        assert_eq!(host.pumped, 3);
    }

    #[tokio::test]
    async fn test_regeneration_failure_is_tolerated() {
        let mut host = QueueHost {
            fail_compute: true,
            queued: 0,
            pumped: 0,
        };
        let report = RecomputeWaiter::default().regenerate(&mut host).await;

        assert!(!report.regenerated);
        assert!(report.drained);
    }

    #[tokio::test]
    async fn test_round_limit_bounds_the_wait() {
        let mut host = QueueHost {
            fail_compute: false,
            queued: 0,
            pumped: 0,
        };
        let report = RecomputeWaiter::new(2).regenerate(&mut host).await;

        assert_eq!(report.rounds, 2);
        assert!(!report.drained);
    }

    #[test]
    fn test_zero_rounds_is_clamped() {
        assert_eq!(RecomputeWaiter::new(0).max_rounds(), 1);
    }
}
