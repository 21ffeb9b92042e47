//! Offline model host
//!
//! A file-backed parametric document plus a reference export backend, so
//! sweeps can run without a CAD engine. Bodies are boxes whose dimensions
//! are parameter expressions.

pub mod document;
pub mod exporter;
pub mod expression;
pub mod mesh;
pub mod models;

pub use document::{Geometry, GeometryStore, ModelDocument};
pub use exporter::ModelExporter;
pub use models::{BodyDef, ComponentDef, ModelFile, ParameterDef};
