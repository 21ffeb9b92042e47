//! Core business logic for paramsweep.
//!
//! # Modules
//!
//! - [`export`] - Sweep coordination, filename planning, progress and summary
//! - [`recompute`] - Regeneration and event pumping after a parameter change
//! - [`state`] - Capture and restoration of the swept parameter
//!
//! # Sweep Workflow
//!
//! 1. **Prepare**: Validate the job and plan every output filename
//! 2. **Snapshot**: Capture the parameter's original expression
//! 3. **Sweep**: For each variation, write the parameter, regenerate and
//!    export every target
//! 4. **Restore**: Write the original expression back and regenerate
//! 5. **Report**: Return the summary
//!
//! # Example
//!
//! ```rust,no_run
//! use paramsweep::adapters::model::{ModelDocument, ModelExporter};
//! use paramsweep::cli::progress::ConsoleProgress;
//! use paramsweep::core::export::SweepCoordinator;
//! use paramsweep::domain::ExportJob;
//!
//! # async fn example(job: ExportJob) -> Result<(), Box<dyn std::error::Error>> {
//! let mut document = ModelDocument::load("bracket.json")?;
//! let exporter = ModelExporter::new(document.geometry());
//! let (_cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
//! let mut progress = ConsoleProgress::new(cancel_rx);
//!
//! let summary = SweepCoordinator::new(&job, &mut document, &exporter, &mut progress)
//!     .execute()
//!     .await?;
//!
//! println!("{}", summary.final_message());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod recompute;
pub mod state;
