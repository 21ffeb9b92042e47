//! Sweep orchestration
//!
//! This module provides the core sweep logic for paramsweep, including:
//! - Filename composition and collision planning
//! - Target selection
//! - Progress tracking and cancellation
//! - Sweep coordination
//! - Summary and reporting

pub mod coordinator;
pub mod naming;
pub mod progress;
pub mod summary;
pub mod targets;

pub use coordinator::{run_sweep, SweepCoordinator, SweepPhase};
pub use naming::{plan_file_names, sanitize, FilePlan, NameComposer, PlannedFile};
pub use progress::ProgressTracker;
pub use summary::{SweepOutcome, SweepSummary, UnitFailure, UnitOutcome};
pub use targets::{resolve_host_targets, resolve_targets, SelectionMask};
