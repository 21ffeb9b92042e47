//! File-backed parametric document
//!
//! [`ModelDocument`] loads a JSON model and acts as a [`DesignHost`]:
//! parameter writes stay in memory, `compute_all` re-evaluates the parameter
//! table and queues one solve per body, and each `process_events` round
//! solves one queued body into the shared [`GeometryStore`].

use super::expression::{self, evaluate_all, evaluate_length};
use super::mesh::SolidBox;
use super::models::{BodyDef, ModelFile, ParameterDef};
use crate::adapters::host::{DesignHost, ObjectInfo};
use crate::domain::context::ResultExt;
use crate::domain::ids::TargetHandle;
use crate::domain::{ObjectKind, Result, SweepError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Geometry shared between the document and its exporter
pub type GeometryStore = Arc<RwLock<Geometry>>;

/// Last solved state of the document
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Model as of the last successful regeneration
    pub snapshot: ModelFile,

    /// Root bodies; `None` until a body first solves
    pub bodies: Vec<Option<SolidBox>>,

    /// Bodies of each component
    pub components: Vec<Vec<Option<SolidBox>>>,
}

impl Geometry {
    /// Solved boxes behind a handle, or `None` if the handle is unknown
    pub fn solids(&self, handle: TargetHandle) -> Option<Vec<SolidBox>> {
        match handle.kind {
            ObjectKind::Body => self
                .bodies
                .get(handle.index)
                .map(|solid| solid.iter().copied().collect()),
            ObjectKind::Component => self
                .components
                .get(handle.index)
                .map(|bodies| bodies.iter().flatten().copied().collect()),
        }
    }

    /// Display name behind a handle
    pub fn object_name(&self, handle: TargetHandle) -> Option<&str> {
        match handle.kind {
            ObjectKind::Body => self.snapshot.bodies.get(handle.index).map(|b| b.name.as_str()),
            ObjectKind::Component => self
                .snapshot
                .components
                .get(handle.index)
                .map(|c| c.name.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodySlot {
    Root(usize),
    Component(usize, usize),
}

/// In-memory parametric document loaded from a model file
#[derive(Debug)]
pub struct ModelDocument {
    source: Option<PathBuf>,
    model: ModelFile,
    table: HashMap<String, String>,
    geometry: GeometryStore,
    pending: VecDeque<BodySlot>,
    regenerations: usize,
}

impl ModelDocument {
    /// Load a model file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the model
    /// does not evaluate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model {}", path.display()))?;
        let model: ModelFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse model {}", path.display()))?;

        let mut document = Self::from_model(model)?;
        document.source = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            name = %document.model.name,
            parameters = document.model.parameters.len(),
            bodies = document.model.bodies.len(),
            components = document.model.components.len(),
            "Loaded model"
        );

        Ok(document)
    }

    /// Build a document from an in-memory model
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Document`] for duplicate parameter names or a
    /// model that does not evaluate.
    pub fn from_model(model: ModelFile) -> Result<Self> {
        let mut seen = HashSet::new();
        for parameter in &model.parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(SweepError::Document(format!(
                    "Duplicate parameter '{}'",
                    parameter.name
                )));
            }
        }

        let table = parameter_table(&model.parameters);
        evaluate_all(&table).map_err(|e| SweepError::Document(e.to_string()))?;

        let bodies = model
            .bodies
            .iter()
            .map(|body| solve_body(body, &table).map(Some))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| SweepError::Document(e.to_string()))?;
        let components = model
            .components
            .iter()
            .map(|component| {
                component
                    .bodies
                    .iter()
                    .map(|body| solve_body(body, &table).map(Some))
                    .collect::<Result<Vec<_>>>()
                    .context(format!("Component '{}'", component.name))
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| SweepError::Document(e.to_string()))?;

        let geometry = Geometry {
            snapshot: model.clone(),
            bodies,
            components,
        };

        Ok(Self {
            source: None,
            model,
            table,
            geometry: Arc::new(RwLock::new(geometry)),
            pending: VecDeque::new(),
            regenerations: 0,
        })
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.model.name
    }

    /// File the model was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Parameters with their current expressions
    pub fn parameters(&self) -> &[ParameterDef] {
        &self.model.parameters
    }

    /// Handle to the solved geometry, for an exporter
    pub fn geometry(&self) -> GeometryStore {
        Arc::clone(&self.geometry)
    }

    /// Number of `compute_all` calls so far
    pub fn regenerations(&self) -> usize {
        self.regenerations
    }

    /// Body solves still queued
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    fn body_def(&self, slot: BodySlot) -> Option<&BodyDef> {
        match slot {
            BodySlot::Root(i) => self.model.bodies.get(i),
            BodySlot::Component(c, b) => self.model.components.get(c)?.bodies.get(b),
        }
    }
}

#[async_trait]
impl DesignHost for ModelDocument {
    fn parameter_expression(&self, name: &str) -> Result<String> {
        self.model
            .parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.expression.clone())
            .ok_or_else(|| SweepError::Parameter(format!("Parameter not found: {name}")))
    }

    fn set_parameter_expression(&mut self, name: &str, expression: &str) -> Result<()> {
        expression::parse(expression)
            .with_context(|| format!("Cannot set '{name}' to {expression}"))?;

        let parameter = self
            .model
            .parameters
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| SweepError::Parameter(format!("Parameter not found: {name}")))?;

        tracing::trace!(parameter = %name, expression = %expression, "Parameter updated");
        parameter.expression = expression.to_string();
        Ok(())
    }

    async fn compute_all(&mut self) -> Result<()> {
        self.regenerations += 1;
        self.pending.clear();

        let table = parameter_table(&self.model.parameters);
        evaluate_all(&table)?;
        self.table = table;

        self.geometry.write().await.snapshot = self.model.clone();

        self.pending
            .extend((0..self.model.bodies.len()).map(BodySlot::Root));
        for (c, component) in self.model.components.iter().enumerate() {
            self.pending
                .extend((0..component.bodies.len()).map(|b| BodySlot::Component(c, b)));
        }

        tracing::debug!(queued = self.pending.len(), "Regeneration queued");
        Ok(())
    }

    async fn process_events(&mut self) -> bool {
        let Some(slot) = self.pending.pop_front() else {
            return false;
        };

        let Some(body) = self.body_def(slot) else {
            return !self.pending.is_empty();
        };

        match solve_body(body, &self.table) {
            Ok(solid) => {
                let mut geometry = self.geometry.write().await;
                let entry = match slot {
                    BodySlot::Root(i) => geometry.bodies.get_mut(i),
                    BodySlot::Component(c, b) => geometry
                        .components
                        .get_mut(c)
                        .and_then(|bodies| bodies.get_mut(b)),
                };
                if let Some(entry) = entry {
                    *entry = Some(solid);
                }
            }
            Err(e) => {
                tracing::warn!(body = %body.name, error = %e, "Body did not solve, keeping previous shape");
            }
        }

        !self.pending.is_empty()
    }

    fn refresh_viewport(&mut self) {
        tracing::trace!(model = %self.model.name, "Viewport refreshed");
    }

    fn bodies(&self) -> Vec<ObjectInfo> {
        self.model
            .bodies
            .iter()
            .enumerate()
            .map(|(i, body)| ObjectInfo::new(body.name.clone(), TargetHandle::body(i)))
            .collect()
    }

    fn components(&self) -> Vec<ObjectInfo> {
        self.model
            .components
            .iter()
            .enumerate()
            .map(|(i, component)| {
                ObjectInfo::new(component.name.clone(), TargetHandle::component(i))
            })
            .collect()
    }
}

fn parameter_table(parameters: &[ParameterDef]) -> HashMap<String, String> {
    parameters
        .iter()
        .map(|p| (p.name.clone(), p.expression.clone()))
        .collect()
}

fn solve_body(body: &BodyDef, table: &HashMap<String, String>) -> Result<SolidBox> {
    let dimension = |expression: &str| {
        evaluate_length(expression, table).with_context(|| format!("Body '{}'", body.name))
    };

    Ok(SolidBox {
        origin: body.origin,
        size: [
            dimension(&body.width)?,
            dimension(&body.depth)?,
            dimension(&body.height)?,
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BRACKET: &str = r#"{
        "name": "bracket",
        "parameters": [
            {"name": "width", "expression": "40 mm"},
            {"name": "label", "expression": "'A'"}
        ],
        "bodies": [
            {"name": "Case", "width": "width", "depth": "20 mm", "height": "5"}
        ],
        "components": [
            {"name": "Lid:1", "bodies": [
                {"name": "Lid", "width": "width", "depth": "20", "height": "2", "origin": [0, 0, 5]}
            ]}
        ]
    }"#;

    fn bracket() -> ModelDocument {
        ModelDocument::from_model(serde_json::from_str(BRACKET).unwrap()).unwrap()
    }

    async fn settle(document: &mut ModelDocument) -> usize {
        let mut rounds = 1;
        while document.process_events().await {
            rounds += 1;
        }
        rounds
    }

    #[test]
    fn test_enumerates_objects_in_order() {
        let document = bracket();

        let bodies = document.bodies();
        assert_eq!(bodies, vec![ObjectInfo::new("Case", TargetHandle::body(0))]);
        let components = document.components();
        assert_eq!(components[0].name, "Lid:1");
        assert_eq!(components[0].handle, TargetHandle::component(0));
    }

    #[tokio::test]
    async fn test_regeneration_resolves_new_width() {
        let mut document = bracket();

        document.set_parameter_expression("width", "60").unwrap();
        document.compute_all().await.unwrap();
        assert_eq!(document.pending_events(), 2);
        assert_eq!(settle(&mut document).await, 2);

        let geometry = document.geometry();
        let geometry = geometry.read().await;
        assert_eq!(geometry.bodies[0].unwrap().size, [60.0, 20.0, 5.0]);
        assert_eq!(geometry.components[0][0].unwrap().origin, [0.0, 0.0, 5.0]);
        assert_eq!(geometry.snapshot.parameters[0].expression, "60");
    }

    #[tokio::test]
    async fn test_failed_regeneration_keeps_last_good_geometry() {
        let mut document = bracket();

        document.set_parameter_expression("width", "missing").unwrap();
        let err = document.compute_all().await.unwrap_err();
        assert!(matches!(err, SweepError::Regeneration(_)));
        assert!(!document.process_events().await);

        let geometry = document.geometry();
        assert_eq!(geometry.read().await.bodies[0].unwrap().size[0], 40.0);
    }

    #[test]
    fn test_set_rejects_malformed_expression() {
        let mut document = bracket();

        let err = document
            .set_parameter_expression("label", "'unterminated")
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(document.parameter_expression("label").unwrap(), "'A'");

        assert!(document.set_parameter_expression("nope", "'A'").is_err());
    }

    #[test]
    fn test_duplicate_parameters_rejected() {
        let model: ModelFile = serde_json::from_str(
            r#"{"name": "dup", "parameters": [
                {"name": "a", "expression": "1"},
                {"name": "a", "expression": "2"}
            ]}"#,
        )
        .unwrap();
        let err = ModelDocument::from_model(model).unwrap_err();
        assert!(err.to_string().contains("Duplicate parameter 'a'"));
    }

    #[tokio::test]
    async fn test_model_file_is_never_rewritten() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BRACKET.as_bytes()).unwrap();

        let mut document = ModelDocument::load(file.path()).unwrap();
        assert_eq!(document.source(), Some(file.path()));
        document.set_parameter_expression("label", "'Z'").unwrap();
        document.compute_all().await.unwrap();
        settle(&mut document).await;

        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), BRACKET);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModelDocument::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, SweepError::Io(_)));
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }
}
