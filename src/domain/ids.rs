//! Domain identifier types with validation
//!
//! Newtype wrappers for the names and handles the sweep passes around.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User parameter name newtype wrapper
///
/// Names the single design parameter a sweep mutates. Surrounding whitespace
/// is trimmed; the remaining name must be non-empty.
///
/// # Examples
///
/// ```
/// use paramsweep::domain::ids::ParameterName;
/// use std::str::FromStr;
///
/// let name = ParameterName::from_str(" hole_label ").unwrap();
/// assert_eq!(name.as_str(), "hole_label");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParameterName(String);

impl ParameterName {
    /// Creates a new ParameterName from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ParameterName)` if the name is valid, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err("Parameter name cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the parameter name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ParameterName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ParameterName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParameterName> for String {
    fn from(name: ParameterName) -> Self {
        name.0
    }
}

impl AsRef<str> for ParameterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of exportable object in a design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Solid body owned by the root component
    Body,
    /// Sub-assembly (component instance / occurrence)
    Component,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Body => write!(f, "body"),
            ObjectKind::Component => write!(f, "component"),
        }
    }
}

/// Opaque identity of an object owned by the design document
///
/// A handle is the object's kind plus its position in the document's
/// enumeration order. Two objects sharing a display name still have
/// distinct handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetHandle {
    /// Object kind
    pub kind: ObjectKind,
    /// Index within the document's enumeration of that kind
    pub index: usize,
}

impl TargetHandle {
    /// Handle of the `index`-th body
    pub fn body(index: usize) -> Self {
        Self {
            kind: ObjectKind::Body,
            index,
        }
    }

    /// Handle of the `index`-th component instance
    pub fn component(index: usize) -> Self {
        Self {
            kind: ObjectKind::Component,
            index,
        }
    }
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_name_valid() {
        let name = ParameterName::new("hole_diameter").unwrap();
        assert_eq!(name.as_str(), "hole_diameter");
        assert_eq!(name.to_string(), "hole_diameter");
    }

    #[test]
    fn test_parameter_name_trims() {
        let name = ParameterName::from_str("  label  ").unwrap();
        assert_eq!(name.into_inner(), "label");
    }

    #[test]
    fn test_parameter_name_empty() {
        assert!(ParameterName::new("").is_err());
        assert!(ParameterName::new("   ").is_err());
    }

    #[test]
    fn test_parameter_name_serde() {
        let name: ParameterName = serde_json::from_str("\"width\"").unwrap();
        assert_eq!(name.as_str(), "width");
        assert!(serde_json::from_str::<ParameterName>("\"\"").is_err());
    }

    #[test]
    fn test_target_handle_ordering() {
        // Bodies sort before components regardless of index
        assert!(TargetHandle::body(5) < TargetHandle::component(0));
        assert!(TargetHandle::body(0) < TargetHandle::body(1));
    }

    #[test]
    fn test_target_handle_display() {
        assert_eq!(TargetHandle::body(2).to_string(), "body#2");
        assert_eq!(TargetHandle::component(0).to_string(), "component#0");
    }
}
