//! Extensions and the registry holding them per extension point.

use std::collections::HashMap;

use extsort_core::{Sorted, TopologicalSort};
use serde::{Deserialize, Serialize};

/// A contribution to an extension point, owned by a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Extension {
    /// Extension point identifier (e.g., `org.example.workbench.model`).
    pub point: String,
    /// Symbolic name of the contributing bundle.
    pub contributor: String,
    /// Optional unique identifier of the extension itself.
    #[serde(default, rename = "id", skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    /// Optional human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Extension {
    pub fn new(point: impl Into<String>, contributor: impl Into<String>) -> Self {
        Self {
            point: point.into(),
            contributor: contributor.into(),
            unique_id: None,
            label: None,
        }
    }

    pub fn with_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The unique id if set, otherwise `contributor@point`.
    pub fn display_name(&self) -> String {
        match &self.unique_id {
            Some(id) => id.clone(),
            None => format!("{}@{}", self.contributor, self.point),
        }
    }
}

/// Registry of extensions grouped by extension point.
///
/// Extensions of a point are kept in registration order; dependency order is
/// computed on demand with [`sorted_for`](Self::sorted_for).
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    points: HashMap<String, Vec<Extension>>,
}

impl ExtensionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
        }
    }

    /// Register an extension under its point.
    pub fn register(&mut self, extension: Extension) {
        self.points
            .entry(extension.point.clone())
            .or_default()
            .push(extension);
    }

    /// Extensions of `point` in registration order.
    pub fn extensions_for(&self, point: &str) -> &[Extension] {
        self.points.get(point).map(Vec::as_slice).unwrap_or_default()
    }

    /// List all extension point ids (sorted).
    pub fn points(&self) -> Vec<String> {
        let mut points: Vec<String> = self.points.keys().cloned().collect();
        points.sort();
        points
    }

    /// Look up an extension by its unique id.
    pub fn get(&self, unique_id: &str) -> Option<&Extension> {
        self.points
            .values()
            .flatten()
            .find(|extension| extension.unique_id.as_deref() == Some(unique_id))
    }

    /// Remove every extension contributed by `contributor`. Returns how many
    /// were removed.
    pub fn remove_contributor(&mut self, contributor: &str) -> usize {
        let mut removed = 0;
        for extensions in self.points.values_mut() {
            let before = extensions.len();
            extensions.retain(|extension| extension.contributor != contributor);
            removed += before - extensions.len();
        }
        self.points.retain(|_, extensions| !extensions.is_empty());
        removed
    }

    /// Extensions of `point` in the order produced by `sorter`.
    pub fn sorted_for<S>(&self, point: &str, sorter: &S) -> Result<Sorted<Extension, S::Key>, S::Error>
    where
        S: TopologicalSort<Item = Extension>,
    {
        sorter.sort(self.extensions_for(point).to_vec())
    }

    /// Total number of registered extensions.
    pub fn len(&self) -> usize {
        self.points.values().map(Vec::len).sum()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
