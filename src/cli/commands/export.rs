//! Export command implementation
//!
//! This module implements the `export` command: load the configured model,
//! sweep the parameter through every variation and export each selected
//! object per variation.

use crate::adapters::factory::create_export_backend;
use crate::adapters::model::ModelDocument;
use crate::cli::progress::ConsoleProgress;
use crate::config::{build_job, load_config, SweepConfig};
use crate::core::export::{SweepCoordinator, SweepSummary};
use crate::core::recompute::RecomputeWaiter;
use crate::domain::job::{parse_variations, ExportJob};
use clap::Args;
use std::io::{self, Write};
use tokio::sync::watch;

/// Failures listed in the final report before truncating
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - plan every file without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Override the parameter to sweep
    #[arg(long)]
    pub parameter: Option<String>,

    /// Override the variations (comma-separated)
    #[arg(long)]
    pub variations: Option<String>,

    /// Override the export format (stl-binary, stl-ascii, 3mf, obj, step, archive)
    #[arg(long)]
    pub format: Option<String>,

    /// Override the output unit (mm, cm, m, in, ft)
    #[arg(long)]
    pub unit: Option<String>,

    /// Override the output folder
    #[arg(short, long)]
    pub output: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if let Err(e) = self.apply_overrides(&mut config) {
            tracing::error!(error = %e, "Invalid command line override");
            eprintln!("{e}");
            return Ok(2);
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let mut document = match ModelDocument::load(&config.document.path) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load model");
                eprintln!("Failed to load model: {e}");
                return Ok(2);
            }
        };

        let job = match build_job(&config, &document) {
            Ok(job) => job,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build export job");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let dry_run = config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        if !self.yes && !dry_run && !confirm(&job)? {
            println!("Export cancelled.");
            return Ok(0);
        }

        let backend = create_export_backend(document.geometry(), dry_run);
        let mut progress = ConsoleProgress::new(shutdown_signal);
        let waiter = RecomputeWaiter::new(config.sweep.event_rounds);

        println!("🚀 Starting export...");
        println!();

        let result = SweepCoordinator::new(&job, &mut document, backend.as_ref(), &mut progress)
            .with_waiter(waiter)
            .execute()
            .await;

        let summary = match result {
            Ok(summary) => summary,
            Err(e) if e.is_configuration() => {
                tracing::error!(error = %e, "Sweep rejected");
                eprintln!("{e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::error!(error = %e, "Sweep failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        print_summary(&summary, dry_run);

        let exit_code = if summary.cancelled {
            println!("⚠️  Export cancelled. The parameter was restored.");
            tracing::info!("Export cancelled by user signal");
            130
        } else if summary.is_successful() {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export completed with failures");
            1
        };

        Ok(exit_code)
    }

    /// Apply command line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut SweepConfig) -> Result<(), String> {
        if let Some(parameter) = &self.parameter {
            tracing::info!(parameter = %parameter, "Overriding parameter from CLI");
            config.sweep.parameter = parameter.clone();
        }

        if let Some(variations) = &self.variations {
            let variations = parse_variations(variations);
            tracing::info!(variations = ?variations, "Overriding variations from CLI");
            config.sweep.variations = variations;
        }

        if let Some(format) = &self.format {
            config.output.format = format.parse()?;
        }

        if let Some(unit) = &self.unit {
            config.output.unit = unit.parse()?;
        }

        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output folder from CLI");
            config.output.folder = output.clone();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        Ok(())
    }
}

/// Show the job and ask before touching the model
fn confirm(job: &ExportJob) -> io::Result<bool> {
    println!("Export Configuration:");
    println!("  Parameter: {}", job.parameter_name);
    println!("  Parameter kind: {}", job.parameter_kind);
    println!("  Format: {}", job.format);
    if job.format.is_mesh() {
        println!("  Unit: {}", job.unit);
        println!("  Mesh refinement: {}", job.mesh_refinement);
    }
    println!(
        "  Variations ({}): {}",
        job.variations.len(),
        job.variations.join(", ")
    );
    println!("  Objects: {}", job.targets.len());
    println!("  Total files: {}", job.total_operations());
    println!("  Output folder: {}", job.output_folder.display());
    println!();
    print!("Proceed with export? [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_summary(summary: &SweepSummary, dry_run: bool) {
    println!();
    println!("📊 Export Summary:");
    println!("  Parameter: {}", summary.parameter);
    println!("  Planned: {}", summary.total_operations);
    println!("  Succeeded: {}", summary.succeeded);
    println!("  Failed: {}", summary.failed);
    if summary.not_attempted() > 0 {
        println!("  Not attempted: {}", summary.not_attempted());
    }
    if summary.regeneration_failures > 0 {
        println!(
            "  Variations with regeneration errors: {}",
            summary.regeneration_failures
        );
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    if dry_run && !summary.exported_files.is_empty() {
        println!("Files that would be written:");
        for path in &summary.exported_files {
            println!("  {}", path.display());
        }
        println!();
    }

    if !summary.failures.is_empty() {
        println!("⚠️  Failed exports:");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {} / {}: {}", failure.variation, failure.target, failure.reason);
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more failures",
                summary.failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }

    println!("{}", summary.final_message());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::{ExportFormat, LengthUnit};

    fn config() -> SweepConfig {
        toml::from_str(
            r#"
[document]
path = "bracket.json"

[sweep]
parameter = "label"
variations = ["A"]

[output]
folder = "/tmp/out"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();
        let mut config = config();

        args.apply_overrides(&mut config).unwrap();

        assert_eq!(config.sweep.parameter, "label");
        assert_eq!(config.sweep.variations, vec!["A"]);
        assert!(!config.application.dry_run);
    }

    #[test]
    fn test_export_args_with_overrides() {
        let args = ExportArgs {
            yes: true,
            dry_run: true,
            parameter: Some("size".to_string()),
            variations: Some("10, 12,,14".to_string()),
            format: Some("stl-ascii".to_string()),
            unit: Some("in".to_string()),
            output: Some("/tmp/elsewhere".to_string()),
        };
        let mut config = config();

        args.apply_overrides(&mut config).unwrap();

        assert_eq!(config.sweep.parameter, "size");
        assert_eq!(config.sweep.variations, vec!["10", "12", "14"]);
        assert_eq!(config.output.format, ExportFormat::StlAscii);
        assert_eq!(config.output.unit, LengthUnit::In);
        assert_eq!(config.output.folder, "/tmp/elsewhere");
        assert!(config.application.dry_run);
    }

    #[test]
    fn test_invalid_format_override() {
        let args = ExportArgs {
            format: Some("iges".to_string()),
            ..Default::default()
        };
        let err = args.apply_overrides(&mut config()).unwrap_err();
        assert!(err.contains("iges"));
    }
}
