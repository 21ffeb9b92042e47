//! Export job model
//!
//! An [`ExportJob`] is built once from configuration before a sweep starts
//! and is read-only for the coordinator's lifetime.

use super::ids::{ParameterName, TargetHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Binary STL
    #[default]
    StlBinary,
    /// ASCII STL
    StlAscii,
    /// 3MF package
    #[serde(rename = "3mf")]
    ThreeMf,
    /// Wavefront OBJ
    Obj,
    /// STEP AP203/AP214
    Step,
    /// Native design archive (the whole document)
    Archive,
}

impl ExportFormat {
    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::StlBinary | ExportFormat::StlAscii => ".stl",
            ExportFormat::ThreeMf => ".3mf",
            ExportFormat::Obj => ".obj",
            ExportFormat::Step => ".step",
            ExportFormat::Archive => ".f3d",
        }
    }

    /// Whether the format is tessellated, so unit and refinement apply
    pub fn is_mesh(&self) -> bool {
        matches!(
            self,
            ExportFormat::StlBinary
                | ExportFormat::StlAscii
                | ExportFormat::ThreeMf
                | ExportFormat::Obj
        )
    }

    /// Whether the backend should write the binary flavour
    pub fn is_binary(&self) -> bool {
        matches!(self, ExportFormat::StlBinary)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::StlBinary => "STL (Binary)",
            ExportFormat::StlAscii => "STL (ASCII)",
            ExportFormat::ThreeMf => "3MF",
            ExportFormat::Obj => "OBJ",
            ExportFormat::Step => "STEP",
            ExportFormat::Archive => "Archive",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stl" | "stl-binary" => Ok(ExportFormat::StlBinary),
            "stl-ascii" => Ok(ExportFormat::StlAscii),
            "3mf" => Ok(ExportFormat::ThreeMf),
            "obj" => Ok(ExportFormat::Obj),
            "step" | "stp" => Ok(ExportFormat::Step),
            "archive" | "f3d" => Ok(ExportFormat::Archive),
            other => Err(format!(
                "Invalid export format '{other}'. Must be one of: stl-binary, stl-ascii, 3mf, obj, step, archive"
            )),
        }
    }
}

/// Length unit for mesh exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Millimeters
    #[default]
    Mm,
    /// Centimeters
    Cm,
    /// Meters
    M,
    /// Inches
    In,
    /// Feet
    Ft,
}

impl LengthUnit {
    /// Number of millimeters in one unit
    pub fn millimeters(&self) -> f64 {
        match self {
            LengthUnit::Mm => 1.0,
            LengthUnit::Cm => 10.0,
            LengthUnit::M => 1000.0,
            LengthUnit::In => 25.4,
            LengthUnit::Ft => 304.8,
        }
    }

    /// Convert a length in millimeters into this unit
    pub fn from_mm(&self, value_mm: f64) -> f64 {
        value_mm / self.millimeters()
    }

    /// Unit suffix as written in expressions
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::In => "in",
            LengthUnit::Ft => "ft",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeters" => Ok(LengthUnit::Mm),
            "cm" | "centimeters" => Ok(LengthUnit::Cm),
            "m" | "meters" => Ok(LengthUnit::M),
            "in" | "inches" => Ok(LengthUnit::In),
            "ft" | "feet" => Ok(LengthUnit::Ft),
            other => Err(format!(
                "Invalid unit '{other}'. Must be one of: mm, cm, m, in, ft"
            )),
        }
    }
}

/// Tessellation quality for mesh exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeshRefinement {
    /// Coarse tessellation
    Low,
    /// Default tessellation
    #[default]
    Medium,
    /// Fine tessellation, larger files
    High,
}

impl fmt::Display for MeshRefinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshRefinement::Low => write!(f, "low"),
            MeshRefinement::Medium => write!(f, "medium"),
            MeshRefinement::High => write!(f, "high"),
        }
    }
}

impl FromStr for MeshRefinement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(MeshRefinement::Low),
            "medium" => Ok(MeshRefinement::Medium),
            "high" => Ok(MeshRefinement::High),
            other => Err(format!(
                "Invalid mesh refinement '{other}'. Must be one of: low, medium, high"
            )),
        }
    }
}

/// How variation text is written into the parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Text parameter: the value is quoted
    #[default]
    Text,
    /// Numeric parameter: the value is passed through verbatim
    Numeric,
}

impl ParameterKind {
    /// Expression to write into the parameter for a variation
    ///
    /// Text values are wrapped in single quotes with embedded quotes escaped.
    /// Numeric values are not validated here; a malformed expression surfaces
    /// when the host evaluates it.
    ///
    /// ```
    /// use paramsweep::domain::ParameterKind;
    ///
    /// assert_eq!(ParameterKind::Text.expression_for("O'Brien"), r"'O\'Brien'");
    /// assert_eq!(ParameterKind::Numeric.expression_for("12 mm"), "12 mm");
    /// ```
    pub fn expression_for(&self, variation: &str) -> String {
        match self {
            ParameterKind::Text => format!("'{}'", variation.replace('\'', "\\'")),
            ParameterKind::Numeric => variation.to_string(),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Text => write!(f, "Text"),
            ParameterKind::Numeric => write!(f, "Numeric"),
        }
    }
}

impl FromStr for ParameterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ParameterKind::Text),
            "numeric" | "number" => Ok(ParameterKind::Numeric),
            other => Err(format!(
                "Invalid parameter kind '{other}'. Must be one of: text, numeric"
            )),
        }
    }
}

/// Filename composition options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NamingOptions {
    /// Optional prefix for every filename
    #[serde(default)]
    pub prefix: String,

    /// Optional suffix for every filename
    #[serde(default)]
    pub suffix: String,

    /// Insert a zero-padded variation number (001, 002, ...)
    #[serde(default)]
    pub add_numbering: bool,

    /// Insert the parameter name
    #[serde(default)]
    pub include_parameter_name: bool,
}

/// One object selected for export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    /// Name shown to the user; not guaranteed unique within a job
    pub display_name: String,

    /// Identity of the object inside the document
    pub handle: TargetHandle,
}

impl ExportTarget {
    /// Creates a new export target
    pub fn new(display_name: impl Into<String>, handle: TargetHandle) -> Self {
        Self {
            display_name: display_name.into(),
            handle,
        }
    }
}

/// Complete description of one sweep
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Parameter to mutate
    pub parameter_name: ParameterName,

    /// Quoting rule for variation values
    pub parameter_kind: ParameterKind,

    /// Variation values in sweep order (trimmed, empty entries dropped)
    pub variations: Vec<String>,

    /// Filename options
    pub naming: NamingOptions,

    /// Output format
    pub format: ExportFormat,

    /// Output unit (mesh formats only)
    pub unit: LengthUnit,

    /// Tessellation quality (mesh formats only)
    pub mesh_refinement: MeshRefinement,

    /// Objects to export, bodies first then components
    pub targets: Vec<ExportTarget>,

    /// Existing folder receiving the files
    pub output_folder: PathBuf,
}

impl ExportJob {
    /// Number of planned exports: variations × targets
    pub fn total_operations(&self) -> usize {
        self.variations.len() * self.targets.len()
    }

    /// Whether the target name is part of each filename
    pub fn is_multi_object(&self) -> bool {
        self.targets.len() > 1
    }
}

/// Builder for [`ExportJob`]
#[derive(Debug, Default)]
pub struct ExportJobBuilder {
    parameter_name: Option<ParameterName>,
    parameter_kind: ParameterKind,
    variations: Vec<String>,
    naming: NamingOptions,
    format: ExportFormat,
    unit: LengthUnit,
    mesh_refinement: MeshRefinement,
    targets: Vec<ExportTarget>,
    output_folder: Option<PathBuf>,
}

impl ExportJobBuilder {
    /// Creates a new ExportJobBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parameter to sweep
    pub fn parameter(mut self, name: ParameterName, kind: ParameterKind) -> Self {
        self.parameter_name = Some(name);
        self.parameter_kind = kind;
        self
    }

    /// Sets the variations; entries are trimmed and empty entries dropped
    pub fn variations<I, S>(mut self, variations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variations = variations
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        self
    }

    /// Sets the naming options
    pub fn naming(mut self, naming: NamingOptions) -> Self {
        self.naming = naming;
        self
    }

    /// Sets the output format
    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the output unit
    pub fn unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the mesh refinement
    pub fn mesh_refinement(mut self, refinement: MeshRefinement) -> Self {
        self.mesh_refinement = refinement;
        self
    }

    /// Sets the resolved targets
    pub fn targets(mut self, targets: Vec<ExportTarget>) -> Self {
        self.targets = targets;
        self
    }

    /// Sets the output folder
    pub fn output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.output_folder = Some(folder.into());
        self
    }

    /// Builds the ExportJob
    ///
    /// Empty variation or target lists are accepted here and rejected when
    /// the sweep is prepared.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter or output folder is missing
    pub fn build(self) -> Result<ExportJob, String> {
        Ok(ExportJob {
            parameter_name: self.parameter_name.ok_or("parameter is required")?,
            parameter_kind: self.parameter_kind,
            variations: self.variations,
            naming: self.naming,
            format: self.format,
            unit: self.unit,
            mesh_refinement: self.mesh_refinement,
            targets: self.targets,
            output_folder: self.output_folder.ok_or("output_folder is required")?,
        })
    }
}

/// Split comma-separated variation input into trimmed, non-empty entries
///
/// ```
/// use paramsweep::domain::job::parse_variations;
///
/// assert_eq!(parse_variations("A, B,, C ,"), vec!["A", "B", "C"]);
/// ```
pub fn parse_variations(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_extensions() {
        assert_eq!(ExportFormat::StlBinary.extension(), ".stl");
        assert_eq!(ExportFormat::StlAscii.extension(), ".stl");
        assert_eq!(ExportFormat::ThreeMf.extension(), ".3mf");
        assert_eq!(ExportFormat::Obj.extension(), ".obj");
        assert_eq!(ExportFormat::Step.extension(), ".step");
        assert_eq!(ExportFormat::Archive.extension(), ".f3d");
    }

    #[test]
    fn test_format_mesh_and_binary_flags() {
        assert!(ExportFormat::StlBinary.is_binary());
        assert!(!ExportFormat::StlAscii.is_binary());
        assert!(ExportFormat::ThreeMf.is_mesh());
        assert!(!ExportFormat::Step.is_mesh());
        assert!(!ExportFormat::Archive.is_mesh());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("STL".parse::<ExportFormat>().unwrap(), ExportFormat::StlBinary);
        assert_eq!("3mf".parse::<ExportFormat>().unwrap(), ExportFormat::ThreeMf);
        assert_eq!("f3d".parse::<ExportFormat>().unwrap(), ExportFormat::Archive);
        assert!("dwg".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: ExportFormat,
        }
        let w: Wrapper = toml::from_str("format = \"3mf\"").unwrap();
        assert_eq!(w.format, ExportFormat::ThreeMf);
        let w: Wrapper = toml::from_str("format = \"stl-ascii\"").unwrap();
        assert_eq!(w.format, ExportFormat::StlAscii);
    }

    #[test]
    fn test_length_unit_conversion() {
        assert_eq!(LengthUnit::Cm.from_mm(25.0), 2.5);
        assert_eq!(LengthUnit::In.from_mm(25.4), 1.0);
        assert_eq!(LengthUnit::Mm.from_mm(3.0), 3.0);
    }

    #[test]
    fn test_text_expression_escapes_quotes() {
        assert_eq!(ParameterKind::Text.expression_for("Red"), "'Red'");
        assert_eq!(ParameterKind::Text.expression_for("O'Brien"), "'O\\'Brien'");
    }

    #[test]
    fn test_numeric_expression_is_verbatim() {
        assert_eq!(ParameterKind::Numeric.expression_for("12.5 mm"), "12.5 mm");
        assert_eq!(ParameterKind::Numeric.expression_for("not a number"), "not a number");
    }

    #[test]
    fn test_builder_normalizes_variations() {
        let job = ExportJobBuilder::new()
            .parameter(ParameterName::new("label").unwrap(), ParameterKind::Text)
            .variations(["  Red ", "", "   ", "Blue"])
            .output_folder("/tmp")
            .build()
            .unwrap();

        assert_eq!(job.variations, vec!["Red", "Blue"]);
        assert_eq!(job.total_operations(), 0);
    }

    #[test]
    fn test_builder_requires_parameter() {
        let result = ExportJobBuilder::new().output_folder("/tmp").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_total_operations() {
        let job = ExportJobBuilder::new()
            .parameter(ParameterName::new("label").unwrap(), ParameterKind::Text)
            .variations(["A", "B", "C"])
            .targets(vec![
                ExportTarget::new("Body1", TargetHandle::body(0)),
                ExportTarget::new("Body2", TargetHandle::body(1)),
            ])
            .output_folder("/tmp")
            .build()
            .unwrap();

        assert_eq!(job.total_operations(), 6);
        assert!(job.is_multi_object());
    }

    #[test]
    fn test_parse_variations() {
        assert_eq!(parse_variations("A, B, C"), vec!["A", "B", "C"]);
        assert!(parse_variations(" , ,").is_empty());
    }
}
