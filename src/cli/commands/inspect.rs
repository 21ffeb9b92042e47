//! Inspect command implementation
//!
//! Lists the parameters and exportable objects of the configured model and,
//! optionally, the file names a sweep would produce. Nothing is modified.

use crate::adapters::host::{DesignHost, ObjectInfo};
use crate::adapters::model::ModelDocument;
use crate::config::{build_job, load_config, selection_mask};
use crate::core::export::{plan_file_names, SelectionMask};
use clap::Args;

/// Arguments for the inspect command
#[derive(Args, Debug, Default)]
pub struct InspectArgs {
    /// Also print the planned file names
    #[arg(long)]
    pub files: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let document = match ModelDocument::load(&config.document.path) {
            Ok(document) => document,
            Err(e) => {
                eprintln!("Failed to load model: {e}");
                return Ok(2);
            }
        };

        let mask = match selection_mask(&config, &document) {
            Ok(mask) => mask,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        println!("📐 Model: {}", document.name());
        println!();
        println!("Parameters:");
        for parameter in document.parameters() {
            let marker = if parameter.name == config.sweep.parameter {
                "*"
            } else {
                " "
            };
            println!(" {marker} {} = {}", parameter.name, parameter.expression);
        }
        println!();
        print_objects("Bodies", &document.bodies(), &mask);
        print_objects("Components", &document.components(), &mask);

        if self.files {
            let job = match build_job(&config, &document) {
                Ok(job) => job,
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(2);
                }
            };

            let plan = plan_file_names(&job);
            println!("Planned files ({}):", plan.len());
            for file in plan.files() {
                let note = if file.disambiguated {
                    "  (renamed to avoid a collision)"
                } else {
                    ""
                };
                println!("  {}{note}", job.output_folder.join(&file.file_name).display());
            }
            println!();
        }

        Ok(0)
    }
}

fn print_objects(title: &str, objects: &[ObjectInfo], mask: &SelectionMask) {
    println!("{title}:");
    if objects.is_empty() {
        println!("  (none)");
    }
    for object in objects {
        let marker = if mask.contains(&object.handle) { "x" } else { " " };
        println!("  [{marker}] {}", object.name);
    }
    println!();
}
