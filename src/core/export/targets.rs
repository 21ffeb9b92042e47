//! Export target resolution
//!
//! Turns the user's object selection into the ordered list of
//! [`ExportTarget`]s a job exports. Selection is by object identity, so two
//! objects with the same display name can be picked independently.

use crate::adapters::host::{DesignHost, ObjectInfo};
use crate::domain::ids::{ObjectKind, TargetHandle};
use crate::domain::job::ExportTarget;
use crate::domain::{Result, SweepError};
use std::collections::HashSet;

/// Set of selected object handles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMask {
    selected: HashSet<TargetHandle>,
}

impl SelectionMask {
    /// An empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every object
    pub fn all(objects: &[ObjectInfo]) -> Self {
        Self {
            selected: objects.iter().map(|o| o.handle).collect(),
        }
    }

    /// Select objects by display name
    ///
    /// Every object carrying a listed name is selected, so a name shared by
    /// several objects selects all of them.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming every listed name that matches
    /// no object of `kind`.
    pub fn by_names(objects: &[ObjectInfo], kind: ObjectKind, names: &[String]) -> Result<Self> {
        let mut mask = Self::new();
        mask.add_names(objects, kind, names)?;
        Ok(mask)
    }

    /// Add objects of `kind` whose display name is listed
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a name matches nothing.
    pub fn add_names(
        &mut self,
        objects: &[ObjectInfo],
        kind: ObjectKind,
        names: &[String],
    ) -> Result<()> {
        let mut unknown = Vec::new();
        for name in names {
            let mut matched = false;
            for object in objects
                .iter()
                .filter(|o| o.handle.kind == kind && o.name == *name)
            {
                self.selected.insert(object.handle);
                matched = true;
            }
            if !matched {
                unknown.push(name.as_str());
            }
        }

        if !unknown.is_empty() {
            return Err(SweepError::Configuration(format!(
                "Unknown {kind} name(s): {}",
                unknown.join(", ")
            )));
        }
        Ok(())
    }

    /// Select a single object
    pub fn insert(&mut self, handle: TargetHandle) {
        self.selected.insert(handle);
    }

    /// Whether an object is selected
    pub fn contains(&self, handle: &TargetHandle) -> bool {
        self.selected.contains(handle)
    }

    /// Number of selected objects
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Resolve a selection against the objects of a design
///
/// Returns bodies before component instances, each group in document
/// enumeration order. The list may be empty; the coordinator refuses to
/// start a sweep without targets.
pub fn resolve_targets(
    bodies: &[ObjectInfo],
    components: &[ObjectInfo],
    mask: &SelectionMask,
) -> Vec<ExportTarget> {
    bodies
        .iter()
        .chain(components.iter())
        .filter(|object| mask.contains(&object.handle))
        .map(|object| ExportTarget::new(object.name.clone(), object.handle))
        .collect()
}

/// Resolve a selection against a live host
pub fn resolve_host_targets(host: &dyn DesignHost, mask: &SelectionMask) -> Vec<ExportTarget> {
    let targets = resolve_targets(&host.bodies(), &host.components(), mask);
    tracing::debug!(
        selected = mask.len(),
        resolved = targets.len(),
        "Resolved export targets"
    );
    targets
}
