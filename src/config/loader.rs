//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SweepConfig;
use crate::domain::errors::SweepError;
use crate::domain::job::parse_variations;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SweepConfig
/// 4. Applies environment variable overrides (PSWEEP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file is missing or unreadable, a
/// referenced environment variable is unset, the TOML does not parse, an
/// override does not parse, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use paramsweep::config::loader::load_config;
///
/// let config = load_config("paramsweep.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SweepConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SweepError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SweepError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SweepConfig = toml::from_str(&contents)
        .map_err(|e| SweepError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SweepError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var regex"))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in
/// one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            result.push('\n');
        }

        if line.trim_start().starts_with('#') {
            result.push_str(line);
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                if !missing_vars.iter().any(|v| v == var_name) {
                    missing_vars.push(var_name.to_string());
                }
                caps[0].to_string()
            })
        });
        result.push_str(&processed);
    }

    if !missing_vars.is_empty() {
        return Err(SweepError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| SweepError::Configuration(format!("{key}: {e}")))
}

/// Applies environment variable overrides using PSWEEP_* prefix
///
/// Environment variables follow the pattern: PSWEEP_<SECTION>_<KEY>
/// For example: PSWEEP_SWEEP_PARAMETER, PSWEEP_OUTPUT_FORMAT
///
/// Malformed booleans and numbers are ignored; malformed enum values are an
/// error.
fn apply_env_overrides(config: &mut SweepConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("PSWEEP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("PSWEEP_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Document overrides
    if let Ok(val) = std::env::var("PSWEEP_DOCUMENT_PATH") {
        config.document.path = val;
    }

    // Sweep overrides
    if let Ok(val) = std::env::var("PSWEEP_SWEEP_PARAMETER") {
        config.sweep.parameter = val;
    }
    if let Ok(val) = std::env::var("PSWEEP_SWEEP_PARAMETER_KIND") {
        config.sweep.parameter_kind = parse_override("PSWEEP_SWEEP_PARAMETER_KIND", &val)?;
    }
    if let Ok(val) = std::env::var("PSWEEP_SWEEP_VARIATIONS") {
        config.sweep.variations = parse_variations(&val);
    }
    if let Ok(val) = std::env::var("PSWEEP_SWEEP_EVENT_ROUNDS") {
        if let Ok(rounds) = val.parse() {
            config.sweep.event_rounds = rounds;
        }
    }

    // Naming overrides
    if let Ok(val) = std::env::var("PSWEEP_NAMING_PREFIX") {
        config.naming.prefix = val;
    }
    if let Ok(val) = std::env::var("PSWEEP_NAMING_SUFFIX") {
        config.naming.suffix = val;
    }
    if let Ok(val) = std::env::var("PSWEEP_NAMING_ADD_NUMBERING") {
        config.naming.add_numbering = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PSWEEP_NAMING_INCLUDE_PARAMETER_NAME") {
        config.naming.include_parameter_name = val.parse().unwrap_or(false);
    }

    // Output overrides
    if let Ok(val) = std::env::var("PSWEEP_OUTPUT_FOLDER") {
        config.output.folder = val;
    }
    if let Ok(val) = std::env::var("PSWEEP_OUTPUT_FORMAT") {
        config.output.format = parse_override("PSWEEP_OUTPUT_FORMAT", &val)?;
    }
    if let Ok(val) = std::env::var("PSWEEP_OUTPUT_UNIT") {
        config.output.unit = parse_override("PSWEEP_OUTPUT_UNIT", &val)?;
    }
    if let Ok(val) = std::env::var("PSWEEP_OUTPUT_MESH_REFINEMENT") {
        config.output.mesh_refinement = parse_override("PSWEEP_OUTPUT_MESH_REFINEMENT", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PSWEEP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PSWEEP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
