//! Sweep coordinator - main orchestrator for a variation sweep
//!
//! This module drives one sweep: for each variation it rewrites the swept
//! parameter, waits for the design to regenerate and exports every target,
//! then restores the parameter however the loop ended.

use crate::adapters::host::{DesignHost, ExportBackend, ExportRequest, ProgressReporter};
use crate::core::export::naming::{plan_file_names, FilePlan};
use crate::core::export::progress::ProgressTracker;
use crate::core::export::summary::{SweepSummary, UnitFailure, UnitOutcome};
use crate::core::recompute::RecomputeWaiter;
use crate::core::state::ParameterStateGuard;
use crate::domain::job::ExportJob;
use crate::domain::{Result, SweepError};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Lifecycle of a coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    /// Created, not yet executed
    Idle,
    /// Validating the job against the design
    Preparing,
    /// Mutating, regenerating and exporting
    Sweeping,
    /// Writing the original parameter expression back
    Restoring,
    /// Finished, successfully or not
    Done,
}

/// Sweep coordinator
///
/// Borrows the design exclusively for the duration of the sweep; no other
/// writer can touch it until the coordinator is dropped.
pub struct SweepCoordinator<'a> {
    job: &'a ExportJob,
    host: &'a mut dyn DesignHost,
    backend: &'a dyn ExportBackend,
    reporter: &'a mut dyn ProgressReporter,
    waiter: RecomputeWaiter,
    phase: SweepPhase,
}

impl<'a> SweepCoordinator<'a> {
    /// Create a new sweep coordinator
    pub fn new(
        job: &'a ExportJob,
        host: &'a mut dyn DesignHost,
        backend: &'a dyn ExportBackend,
        reporter: &'a mut dyn ProgressReporter,
    ) -> Self {
        Self {
            job,
            host,
            backend,
            reporter,
            waiter: RecomputeWaiter::default(),
            phase: SweepPhase::Idle,
        }
    }

    /// Use a custom regeneration waiter
    pub fn with_waiter(mut self, waiter: RecomputeWaiter) -> Self {
        self.waiter = waiter;
        self
    }

    /// Current phase
    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    /// Execute the sweep
    ///
    /// This is the main entry point. It:
    /// 1. Validates the job (variations, targets, output folder, parameter)
    /// 2. Captures the parameter's original expression
    /// 3. For each variation:
    ///    - Writes the variation into the parameter
    ///    - Regenerates and waits for the host to settle
    ///    - Exports every target to its planned filename
    /// 4. Restores the original expression
    /// 5. Returns the summary
    ///
    /// Per-export failures are counted in the summary and never abort the
    /// sweep. Cancellation is observed before each variation and before each
    /// export.
    ///
    /// The restore only runs if the returned future is driven to
    /// completion. Dropping it mid-sweep (a `select!` branch losing, a
    /// timeout firing) leaves the parameter at the last written variation;
    /// cancel through the [`ProgressReporter`] instead.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the job is invalid (nothing is
    /// mutated in that case), or an error if the original expression cannot
    /// be restored.
    pub async fn execute(&mut self) -> Result<SweepSummary> {
        if self.phase != SweepPhase::Idle {
            return Err(SweepError::Other(
                "Sweep coordinator has already run".to_string(),
            ));
        }

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "sweep",
            run_id = %run_id,
            parameter = %self.job.parameter_name
        );
        self.run(run_id).instrument(span).await
    }

    async fn run(&mut self, run_id: Uuid) -> Result<SweepSummary> {
        let start_time = Instant::now();

        self.transition(SweepPhase::Preparing);
        let prepared = self.prepare().and_then(|plan| {
            let guard = ParameterStateGuard::acquire(&*self.host, &self.job.parameter_name)?;
            Ok((plan, guard))
        });
        let (plan, guard) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(error = %e, "Sweep rejected");
                self.transition(SweepPhase::Done);
                return Err(e);
            }
        };

        let mut summary = SweepSummary::new(
            run_id,
            self.job.parameter_name.as_str(),
            self.job.total_operations(),
        );
        crate::log_sweep_start!(self.job);

        self.transition(SweepPhase::Sweeping);
        let swept = AssertUnwindSafe(self.sweep(&plan, &mut summary))
            .catch_unwind()
            .await;

        self.transition(SweepPhase::Restoring);
        let restored = guard.release(&mut *self.host, &self.waiter).await;
        self.transition(SweepPhase::Done);

        if let Err(panic) = swept {
            tracing::error!(
                restored = restored.is_ok(),
                "Sweep aborted by an unexpected fault"
            );
            std::panic::resume_unwind(panic);
        }

        restored?;
        summary.restored = true;

        debug_assert!(summary.succeeded <= summary.total_operations);
        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    /// Validate the job and plan every filename
    fn prepare(&self) -> Result<FilePlan> {
        let job = self.job;

        if job.variations.is_empty() {
            return Err(SweepError::Configuration(
                "No variations entered".to_string(),
            ));
        }

        if job.targets.is_empty() {
            return Err(SweepError::Configuration(
                "No objects selected for export".to_string(),
            ));
        }

        if !job.output_folder.is_absolute() || !job.output_folder.is_dir() {
            return Err(SweepError::Configuration(format!(
                "Please select a valid output folder: {}",
                job.output_folder.display()
            )));
        }

        self.host
            .parameter_expression(job.parameter_name.as_str())
            .map_err(|e| {
                SweepError::Configuration(format!(
                    "Parameter not found: {} ({e})",
                    job.parameter_name
                ))
            })?;

        if !self.backend.supports(job.format) {
            tracing::warn!(
                format = %job.format,
                "Export backend does not support this format, every export will fail"
            );
        }

        let plan = plan_file_names(job);
        tracing::debug!(
            files = plan.len(),
            collisions = plan.collisions(),
            "Planned output filenames"
        );

        Ok(plan)
    }

    /// The variation × target loop
    async fn sweep(&mut self, plan: &FilePlan, summary: &mut SweepSummary) {
        let job = self.job;
        let parameter = job.parameter_name.as_str();
        let mut tracker = ProgressTracker::new(&mut *self.reporter, job.total_operations());

        for (vi, variation) in job.variations.iter().enumerate() {
            if tracker.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            tracing::info!(
                index = vi + 1,
                count = job.variations.len(),
                variation = %variation,
                "Processing variation"
            );

            let expression = job.parameter_kind.expression_for(variation);
            if let Err(e) = self.host.set_parameter_expression(parameter, &expression) {
                tracing::warn!(
                    variation = %variation,
                    expression = %expression,
                    error = %e,
                    "Parameter rejected variation, skipping its exports"
                );
                for (ti, target) in job.targets.iter().enumerate() {
                    let path = plan
                        .get(vi, ti)
                        .map(|p| job.output_folder.join(&p.file_name))
                        .unwrap_or_else(|| job.output_folder.clone());
                    summary.record_failure(UnitFailure {
                        variation: variation.clone(),
                        target: target.display_name.clone(),
                        path,
                        reason: e.to_string(),
                    });
                }
                tracker.skip(
                    job.targets.len(),
                    format!("Skipped: {variation}"),
                );
                continue;
            }

            let report = self.waiter.regenerate(&mut *self.host).await;
            if !report.regenerated {
                summary.regeneration_failures += 1;
            }

            self.host.refresh_viewport();

            for (ti, target) in job.targets.iter().enumerate() {
                if tracker.is_cancelled() {
                    summary.cancelled = true;
                    break;
                }

                tracker.advance(format!(
                    "Exporting: {variation} - {}",
                    target.display_name
                ));

                let Some(planned) = plan.get(vi, ti) else {
                    summary.record_failure(UnitFailure {
                        variation: variation.clone(),
                        target: target.display_name.clone(),
                        path: job.output_folder.clone(),
                        reason: "no filename planned for this export".to_string(),
                    });
                    continue;
                };
                let path = job.output_folder.join(&planned.file_name);

                let request = ExportRequest {
                    format: job.format,
                    target: target.handle,
                    target_name: target.display_name.clone(),
                    path: path.clone(),
                    unit: job.unit,
                    refinement: job.mesh_refinement,
                    binary: job.format.is_binary(),
                };

                let result = self.backend.export(&request).await;
                if result.is_ok() {
                    tracing::debug!(path = %path.display(), "Exported");
                }

                summary.record(
                    UnitOutcome {
                        variation_index: vi,
                        target_index: ti,
                        path,
                        result,
                    },
                    variation,
                    &target.display_name,
                );
            }

            if summary.cancelled {
                break;
            }
        }

        if summary.cancelled {
            tracing::info!(
                completed = summary.succeeded + summary.failed,
                total = summary.total_operations,
                "Sweep cancelled"
            );
        }
    }

    fn transition(&mut self, next: SweepPhase) {
        tracing::debug!(from = ?self.phase, to = ?next, "Sweep phase");
        self.phase = next;
    }
}

/// Run one sweep with default settings
///
/// Convenience wrapper around [`SweepCoordinator`].
pub async fn run_sweep(
    job: &ExportJob,
    host: &mut dyn DesignHost,
    backend: &dyn ExportBackend,
    reporter: &mut dyn ProgressReporter,
    waiter: RecomputeWaiter,
) -> Result<SweepSummary> {
    SweepCoordinator::new(job, host, backend, reporter)
        .with_waiter(waiter)
        .execute()
        .await
}
