//! Host abstraction traits
//!
//! This module defines the traits a design host, an export backend and a
//! progress surface must implement to be driven by the sweep coordinator.

use crate::domain::errors::ExportFailure;
use crate::domain::ids::TargetHandle;
use crate::domain::job::{ExportFormat, LengthUnit, MeshRefinement};
use crate::domain::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// An exportable object as enumerated by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Display name, possibly shared with other objects
    pub name: String,

    /// Identity of the object
    pub handle: TargetHandle,
}

impl ObjectInfo {
    /// Creates a new ObjectInfo
    pub fn new(name: impl Into<String>, handle: TargetHandle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }
}

/// One export call
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    /// Output format
    pub format: ExportFormat,

    /// Object to write
    pub target: TargetHandle,

    /// Display name of the object, for headers and logs
    pub target_name: String,

    /// Absolute output path
    pub path: PathBuf,

    /// Output unit (mesh formats only)
    pub unit: LengthUnit,

    /// Tessellation quality (mesh formats only)
    pub refinement: MeshRefinement,

    /// Write the binary flavour of the format
    pub binary: bool,
}

/// A live parametric design owned by the host application
///
/// The coordinator assumes exclusive access for the duration of a sweep;
/// it holds the host by `&mut` so no other writer can reach it.
#[async_trait]
pub trait DesignHost: Send {
    /// Current expression of a user parameter
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SweepError::Parameter`] if no parameter has that name.
    fn parameter_expression(&self, name: &str) -> Result<String>;

    /// Replace the expression of a user parameter
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is missing or the host rejects the
    /// expression outright.
    fn set_parameter_expression(&mut self, name: &str, expression: &str) -> Result<()>;

    /// Trigger a full regeneration of the design
    ///
    /// Regeneration work may be queued and only completed while
    /// [`DesignHost::process_events`] is pumped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SweepError::Regeneration`] if the design cannot be evaluated.
    async fn compute_all(&mut self) -> Result<()>;

    /// Pump one round of the host's event queue
    ///
    /// Returns `true` while queued work remains.
    async fn process_events(&mut self) -> bool;

    /// Redraw the viewport
    fn refresh_viewport(&mut self);

    /// Solid bodies of the root component, in document order
    fn bodies(&self) -> Vec<ObjectInfo>;

    /// Component instances, in document order
    fn components(&self) -> Vec<ObjectInfo>;
}

/// Format-specific file writer
///
/// Implementations either write the requested file or fail; the coordinator
/// treats each call as atomic.
#[async_trait]
pub trait ExportBackend: Send + Sync {
    /// Write one object to one file
    async fn export(&self, request: &ExportRequest) -> std::result::Result<(), ExportFailure>;

    /// Whether this backend can write `format` at all
    fn supports(&self, _format: ExportFormat) -> bool {
        true
    }
}

/// Progress and cancellation surface
pub trait ProgressReporter: Send {
    /// Report the current position in the sweep
    fn report(&mut self, current: usize, total: usize, message: &str);

    /// Whether the user asked to stop
    fn is_cancelled(&self) -> bool;
}
