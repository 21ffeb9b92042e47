//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file and, optionally, a sample model to sweep.

use crate::adapters::model::{BodyDef, ComponentDef, ModelFile, ParameterDef};
use clap::Args;
use std::fs;
use std::path::Path;

/// File name of the sample model written by `--with-model`
pub const SAMPLE_MODEL_FILE: &str = "bracket.json";

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "paramsweep.toml")]
    pub output: String,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Also write a sample model next to the configuration
    #[arg(long)]
    pub with_model: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing paramsweep configuration");
        println!();

        let config_path = Path::new(&self.output);
        if config_path.exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let model_path = config_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(SAMPLE_MODEL_FILE);
        if self.with_model && model_path.exists() && !self.force {
            println!("❌ Model file already exists: {}", model_path.display());
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        if let Err(e) = fs::write(config_path, generate_config()) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {e}");
            return Ok(5);
        }
        println!("✅ Configuration file created: {}", self.output);

        if self.with_model {
            let model = serde_json::to_string_pretty(&sample_model())?;
            if let Err(e) = fs::write(&model_path, model) {
                println!("❌ Failed to write model file");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Sample model created: {}", model_path.display());
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your settings", self.output);
        println!("  2. Create the output folder named in [output]");
        println!("  3. Inspect the model: paramsweep inspect --files");
        println!("  4. Validate configuration: paramsweep validate-config");
        println!("  5. Run export: paramsweep export");
        println!();
        Ok(0)
    }
}

/// Sample configuration with every section commented
pub fn generate_config() -> String {
    format!(
        r#"# paramsweep configuration
# Values may reference environment variables as ${{VAR_NAME}}.
# Every key can also be overridden with PSWEEP_<SECTION>_<KEY>.

[application]
# trace, debug, info, warn, error
log_level = "info"
# Plan every file without writing anything
dry_run = false

[document]
# JSON model file; it is never modified
path = "{SAMPLE_MODEL_FILE}"

[sweep]
# User parameter to vary
parameter = "label"
# "text" values are quoted ('Red'), "numeric" values are written verbatim (12 mm)
parameter_kind = "text"
# A list, or one comma-separated string
variations = ["Red", "Green", "Blue"]
# Upper bound on event rounds while a variation regenerates
event_rounds = 100

[naming]
prefix = ""
suffix = ""
# Prefix each file with the variation number (001_, 002_, ...)
add_numbering = true
# Insert the parameter name before the value
include_parameter_name = false

[output]
# Existing folder, absolute or relative to the working directory
folder = "./exports"
# stl-binary, stl-ascii, 3mf, obj, step, archive
format = "stl-binary"
# mm, cm, m, in, ft (mesh formats only)
unit = "mm"
# low, medium, high (mesh formats only)
mesh_refinement = "medium"

[targets]
all_bodies = true
all_components = false
bodies = []
components = ["Clip:1"]

[logging]
local_enabled = false
local_path = "./logs"
# daily, hourly, never
local_rotation = "daily"
"#
    )
}

/// Small bracket with a text label and two length parameters
pub fn sample_model() -> ModelFile {
    let body = |name: &str, width: &str, depth: &str, height: &str, origin: [f64; 3]| BodyDef {
        name: name.to_string(),
        width: width.to_string(),
        depth: depth.to_string(),
        height: height.to_string(),
        origin,
    };
    let parameter = |name: &str, expression: &str| ParameterDef {
        name: name.to_string(),
        expression: expression.to_string(),
    };

    ModelFile {
        name: "bracket".to_string(),
        parameters: vec![
            parameter("label", "'Red'"),
            parameter("width", "40 mm"),
            parameter("thickness", "3 mm"),
        ],
        bodies: vec![
            body("Base", "width", "20 mm", "thickness", [0.0; 3]),
            body("Upright", "width", "thickness", "30 mm", [0.0; 3]),
        ],
        components: vec![ComponentDef {
            name: "Clip:1".to_string(),
            bodies: vec![body("Clip", "10 mm", "10 mm", "thickness", [0.0, 25.0, 0.0])],
        }],
    }
}
