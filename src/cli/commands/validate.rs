//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the paramsweep configuration file.

use crate::config::{load_config, SweepConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config);
        Ok(0)
    }
}

fn print_summary(config: &SweepConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Document: {}", config.document.path);
    println!(
        "  Parameter: {} ({})",
        config.sweep.parameter, config.sweep.parameter_kind
    );
    println!("  Variations: {:?}", config.sweep.variations);
    println!("  Output Folder: {}", config.output.folder);
    println!("  Format: {}", config.output.format);
    if config.output.format.is_mesh() {
        println!("  Unit: {}", config.output.unit);
        println!("  Mesh Refinement: {}", config.output.mesh_refinement);
    }

    let targets = &config.targets;
    println!(
        "  Targets: all_bodies={}, all_components={}, bodies={:?}, components={:?}",
        targets.all_bodies, targets.all_components, targets.bodies, targets.components
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_config_is_exit_2() {
        let code = ValidateArgs {}.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_valid_config_is_exit_0() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[document]
path = "bracket.json"

[sweep]
parameter = "label"
variations = "A, B"

[output]
folder = "/tmp"
"#,
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let code = ValidateArgs {}.execute(&path).await.unwrap();
        assert_eq!(code, 0);
    }
}
