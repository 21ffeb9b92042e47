//! Domain models and types for paramsweep.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`ParameterName`], [`TargetHandle`])
//! - **Job model** ([`ExportJob`], [`NamingOptions`], [`ExportTarget`] and the
//!   format/unit/refinement enums)
//! - **Error types** ([`SweepError`], [`ExportFailure`])
//! - **Result type alias** ([`Result`]) and the [`context::ResultExt`] extension
//!
//! # Building a job
//!
//! ```rust
//! use paramsweep::domain::{
//!     ExportFormat, ExportJobBuilder, ExportTarget, NamingOptions, ParameterKind,
//!     ParameterName, TargetHandle,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = ExportJobBuilder::new()
//!     .parameter(ParameterName::new("label")?, ParameterKind::Text)
//!     .variations(["Red", "Blue"])
//!     .naming(NamingOptions {
//!         prefix: "part".to_string(),
//!         add_numbering: true,
//!         ..Default::default()
//!     })
//!     .format(ExportFormat::StlBinary)
//!     .targets(vec![ExportTarget::new("Case", TargetHandle::body(0))])
//!     .output_folder("/tmp/exports")
//!     .build()?;
//!
//! assert_eq!(job.total_operations(), 2);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod errors;
pub mod ids;
pub mod job;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ExportFailure, SweepError};
pub use ids::{ObjectKind, ParameterName, TargetHandle};
pub use job::{
    parse_variations, ExportFormat, ExportJob, ExportJobBuilder, ExportTarget, LengthUnit,
    MeshRefinement, NamingOptions, ParameterKind,
};
pub use result::Result;
