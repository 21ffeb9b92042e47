//! Configuration management for paramsweep.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! paramsweep uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PSWEEP_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paramsweep::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("paramsweep.toml")?;
//!
//! println!("Parameter: {}", config.sweep.parameter);
//! println!("Variations: {}", config.sweep.variations.join(", "));
//! println!("Output: {} ({})", config.output.folder, config.output.format);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level, dry run
//! - [`DocumentConfig`] - Model file
//! - [`SweepSection`] - Parameter, quoting, variations, event rounds
//! - [`NamingOptions`](crate::domain::NamingOptions) - Filename prefix, suffix, numbering
//! - [`OutputConfig`] - Folder, format, unit, mesh refinement
//! - [`TargetsConfig`] - Bodies and components to export
//! - [`LoggingConfig`] - Log files
//!
//! # Example Configuration
//!
//! ```toml
//! [document]
//! path = "bracket.json"
//!
//! [sweep]
//! parameter = "label"
//! parameter_kind = "text"
//! variations = "Red, Green, Blue"
//!
//! [naming]
//! prefix = "bracket"
//! add_numbering = true
//!
//! [output]
//! folder = "${HOME}/exports"
//! format = "stl-binary"
//!
//! [targets]
//! all_bodies = true
//! ```

pub mod job;
pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use job::{build_job, selection_mask};
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DocumentConfig, LoggingConfig, OutputConfig, SweepConfig, SweepSection,
    TargetsConfig,
};
