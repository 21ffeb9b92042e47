//! Export backend factory
//!
//! Picks the backend for a run: the model exporter normally, the dry-run
//! recorder when nothing should be written.

use crate::adapters::dry_run::DryRunBackend;
use crate::adapters::host::ExportBackend;
use crate::adapters::model::{GeometryStore, ModelExporter};
use std::sync::Arc;

/// Create the export backend for a run
///
/// # Arguments
///
/// * `geometry` - Geometry of the loaded document
/// * `dry_run` - Record exports without writing files
pub fn create_export_backend(geometry: GeometryStore, dry_run: bool) -> Arc<dyn ExportBackend> {
    if dry_run {
        tracing::info!("Creating dry-run export backend");
        Arc::new(DryRunBackend::new())
    } else {
        tracing::debug!("Creating model export backend");
        Arc::new(ModelExporter::new(geometry))
    }
}
