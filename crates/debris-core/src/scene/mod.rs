#![forbid(unsafe_code)]

//! A scene: a parameter graph plus the rendered groups bound to it.

pub mod presets;

use ahash::AHashSet;

use crate::graph::{GraphError, ParameterGraph, ParameterValues};
use crate::transform::{Transform, TransformGroup};

/// Parameter graph and transform groups evaluated together.
#[derive(Debug, Clone)]
pub struct Scene {
    graph: ParameterGraph,
    groups: Vec<TransformGroup>,
}

impl Scene {
    /// Assemble a scene, checking that every binding points into `graph`
    /// and that group names are unique.
    pub fn new(graph: ParameterGraph, groups: Vec<TransformGroup>) -> Result<Self, GraphError> {
        let mut seen = AHashSet::with_capacity(groups.len());
        for group in &groups {
            if !seen.insert(group.name()) {
                return Err(GraphError::DuplicateName(group.name().to_owned()));
            }
            if let Some((_, id)) = group.bindings().find(|(_, id)| !graph.contains(*id)) {
                return Err(GraphError::UnknownParam {
                    name: group.name().to_owned(),
                    id,
                });
            }
        }
        Ok(Self { graph, groups })
    }

    #[must_use]
    pub fn graph(&self) -> &ParameterGraph {
        &self.graph
    }

    /// All groups in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[TransformGroup] {
        &self.groups
    }

    /// Group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&TransformGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// Groups captured into the debris snapshot.
    pub fn debris_groups(&self) -> impl Iterator<Item = &TransformGroup> + '_ {
        self.groups.iter().filter(|g| g.is_debris())
    }

    /// Evaluate the graph at `progress`.
    #[must_use]
    pub fn evaluate(&self, progress: f64) -> ParameterValues {
        self.graph.evaluate(progress)
    }

    /// Resolve a named group against already evaluated values.
    #[must_use]
    pub fn transform(&self, name: &str, values: &ParameterValues) -> Option<Transform> {
        self.group(name).map(|g| g.resolve(values))
    }
}
