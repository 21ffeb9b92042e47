//! Host abstraction layer
//!
//! The sweep never talks to a CAD engine directly. It drives a design
//! through [`DesignHost`], writes files through [`ExportBackend`] and reports
//! progress through [`ProgressReporter`].

pub mod traits;

pub use traits::{DesignHost, ExportBackend, ExportRequest, ObjectInfo, ProgressReporter};
