//! Building an [`ExportJob`] from configuration
//!
//! Names in `[targets]` are resolved against the loaded design here, so a
//! typo fails before anything is touched.

use super::schema::SweepConfig;
use crate::adapters::host::DesignHost;
use crate::core::export::targets::{resolve_host_targets, SelectionMask};
use crate::domain::ids::{ObjectKind, ParameterName};
use crate::domain::job::{ExportJob, ExportJobBuilder};
use crate::domain::{Result, SweepError};
use std::path::{Path, PathBuf};

/// Build the job described by `config` against `host`
///
/// The output folder is made absolute when it exists; a missing folder is
/// kept as written and rejected when the sweep starts.
///
/// # Errors
///
/// Returns a configuration error for an invalid parameter name or a target
/// name that matches no object.
pub fn build_job(config: &SweepConfig, host: &dyn DesignHost) -> Result<ExportJob> {
    let parameter = ParameterName::new(config.sweep.parameter.as_str())
        .map_err(SweepError::Configuration)?;

    let mask = selection_mask(config, host)?;
    let targets = resolve_host_targets(host, &mask);

    ExportJobBuilder::new()
        .parameter(parameter, config.sweep.parameter_kind)
        .variations(&config.sweep.variations)
        .naming(config.naming.clone())
        .format(config.output.format)
        .unit(config.output.unit)
        .mesh_refinement(config.output.mesh_refinement)
        .targets(targets)
        .output_folder(absolute_folder(Path::new(&config.output.folder)))
        .build()
        .map_err(SweepError::Configuration)
}

/// Selection described by `[targets]`
///
/// # Errors
///
/// Returns a configuration error naming unknown bodies or components.
pub fn selection_mask(config: &SweepConfig, host: &dyn DesignHost) -> Result<SelectionMask> {
    let targets = &config.targets;
    let bodies = host.bodies();
    let components = host.components();

    let mut mask = SelectionMask::new();
    if targets.all_bodies {
        bodies.iter().for_each(|b| mask.insert(b.handle));
    }
    if targets.all_components {
        components.iter().for_each(|c| mask.insert(c.handle));
    }
    mask.add_names(&bodies, ObjectKind::Body, &targets.bodies)?;
    mask.add_names(&components, ObjectKind::Component, &targets.components)?;

    Ok(mask)
}

fn absolute_folder(folder: &Path) -> PathBuf {
    std::fs::canonicalize(folder).unwrap_or_else(|_| folder.to_path_buf())
}
