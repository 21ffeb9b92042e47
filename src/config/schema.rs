//! Configuration schema types
//!
//! This module defines the configuration structure that maps to
//! `paramsweep.toml`.

use crate::domain::job::{
    parse_variations, ExportFormat, LengthUnit, MeshRefinement, NamingOptions, ParameterKind,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Largest accepted `sweep.event_rounds`
pub const MAX_EVENT_ROUNDS: usize = 10_000;

/// Main paramsweep configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Model document to load
    pub document: DocumentConfig,

    /// Parameter and variations
    pub sweep: SweepSection,

    /// Filename options
    #[serde(default)]
    pub naming: NamingOptions,

    /// Output folder and format
    pub output: OutputConfig,

    /// Objects to export
    #[serde(default)]
    pub targets: TargetsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SweepConfig {
    /// Validates the configuration
    ///
    /// Folder and parameter existence are checked when the sweep starts.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.document.validate()?;
        self.sweep.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Record exports without writing files
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Model document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path to the JSON model file
    pub path: String,
}

impl DocumentConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("document.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSection {
    /// Name of the parameter to vary
    pub parameter: String,

    /// Text parameters are quoted, numeric ones written verbatim
    #[serde(default)]
    pub parameter_kind: ParameterKind,

    /// Values to sweep, as a list or one comma-separated string
    #[serde(deserialize_with = "deserialize_variations")]
    pub variations: Vec<String>,

    /// Bound on event rounds while waiting for regeneration
    #[serde(default = "default_event_rounds")]
    pub event_rounds: usize,
}

impl SweepSection {
    fn validate(&self) -> Result<(), String> {
        if self.parameter.trim().is_empty() {
            return Err("sweep.parameter cannot be empty".to_string());
        }

        if self.variations.iter().all(|v| v.trim().is_empty()) {
            return Err("sweep.variations must contain at least one value".to_string());
        }

        if self.event_rounds == 0 || self.event_rounds > MAX_EVENT_ROUNDS {
            return Err(format!(
                "sweep.event_rounds must be between 1 and {MAX_EVENT_ROUNDS}"
            ));
        }

        Ok(())
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Existing folder receiving the files
    pub folder: String,

    /// Export format
    #[serde(default)]
    pub format: ExportFormat,

    /// Unit for mesh formats
    #[serde(default)]
    pub unit: LengthUnit,

    /// Tessellation quality for mesh formats
    #[serde(default)]
    pub mesh_refinement: MeshRefinement,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.folder.trim().is_empty() {
            return Err("output.folder cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Object selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Export every root body
    #[serde(default)]
    pub all_bodies: bool,

    /// Export every component
    #[serde(default)]
    pub all_components: bool,

    /// Root bodies to export, by name
    #[serde(default)]
    pub bodies: Vec<String>,

    /// Components to export, by name
    #[serde(default)]
    pub components: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to files
    #[serde(default)]
    pub local_enabled: bool,

    /// Log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VariationInput {
    List(Vec<String>),
    Text(String),
}

fn deserialize_variations<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let variations = match VariationInput::deserialize(deserializer)? {
        VariationInput::List(list) => list
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
        VariationInput::Text(text) => parse_variations(&text),
    };
    Ok(variations)
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_event_rounds() -> usize {
    crate::core::recompute::DEFAULT_EVENT_ROUNDS
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SweepConfig {
        toml::from_str(
            r#"
[document]
path = "bracket.json"

[sweep]
parameter = "label"
variations = ["Red", " Blue ", ""]

[output]
folder = "/tmp/out"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = sample();

        assert_eq!(config.application.log_level, "info");
        assert!(!config.application.dry_run);
        assert_eq!(config.sweep.parameter_kind, ParameterKind::Text);
        assert_eq!(config.sweep.variations, vec!["Red", "Blue"]);
        assert_eq!(config.sweep.event_rounds, 100);
        assert_eq!(config.output.format, ExportFormat::StlBinary);
        assert_eq!(config.output.unit, LengthUnit::Mm);
        assert_eq!(config.output.mesh_refinement, MeshRefinement::Medium);
        assert!(!config.targets.all_bodies);
        assert_eq!(config.naming, NamingOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_comma_separated_variations() {
        let config: SweepConfig = toml::from_str(
            r#"
[document]
path = "m.json"

[sweep]
parameter = "size"
parameter_kind = "numeric"
variations = "10 mm, 12 mm,, 14 mm"

[output]
folder = "/tmp/out"
format = "3mf"
unit = "in"
mesh_refinement = "high"
"#,
        )
        .unwrap();

        assert_eq!(config.sweep.variations, vec!["10 mm", "12 mm", "14 mm"]);
        assert_eq!(config.sweep.parameter_kind, ParameterKind::Numeric);
        assert_eq!(config.output.format, ExportFormat::ThreeMf);
        assert_eq!(config.output.unit, LengthUnit::In);
        assert_eq!(config.output.mesh_refinement, MeshRefinement::High);
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = sample();
        config.application.log_level = "INFO".to_string();
        assert!(config.validate().is_ok());
        config.application.log_level = "Debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = sample();
        config.application.log_level = "loud".to_string();
        assert!(config.validate().unwrap_err().contains("log_level"));

        let mut config = sample();
        config.sweep.variations = vec![" ".to_string()];
        assert!(config.validate().unwrap_err().contains("at least one"));

        let mut config = sample();
        config.sweep.event_rounds = 0;
        assert!(config.validate().is_err());
        config.sweep.event_rounds = MAX_EVENT_ROUNDS + 1;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.sweep.parameter = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = sample();
        config.logging.local_rotation = "size".to_string();
        assert!(config.validate().unwrap_err().contains("local_rotation"));
    }
}
