//! Model file structures
//!
//! These structs mirror the JSON model file. They are separate from the live
//! [`super::ModelDocument`], which owns a copy and mutates it in memory only.

use serde::{Deserialize, Serialize};

/// A parametric model as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    /// Model name
    pub name: String,

    /// User parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,

    /// Root-level bodies
    #[serde(default)]
    pub bodies: Vec<BodyDef>,

    /// Sub-assembly instances
    #[serde(default)]
    pub components: Vec<ComponentDef>,
}

/// A named user parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    pub expression: String,
}

/// A box-shaped body; dimensions are expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDef {
    pub name: String,
    pub width: String,
    pub depth: String,
    pub height: String,

    /// Minimum corner in millimetres
    #[serde(default)]
    pub origin: [f64; 3],
}

/// A component instance and its bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub name: String,

    #[serde(default)]
    pub bodies: Vec<BodyDef>,
}
