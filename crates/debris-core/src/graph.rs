#![forbid(unsafe_code)]

//! Parameter Graph: one progress scalar in, many animatable values out.
//!
//! Every parameter pairs a [`Source`] (where its input comes from) with a
//! [`Mapping`] (how input becomes output). Sources are the progress signal
//! itself, the live output of an earlier parameter, or a [`CombineOp`] over
//! several earlier parameters. Mappings are keyframe tracks, identity,
//! affine maps or constants.
//!
//! # Ordering
//!
//! [`GraphBuilder`] only accepts references to parameters that already
//! exist, so insertion order is a topological order and cycles cannot be
//! expressed. [`ParameterGraph::evaluate`] is a single forward pass.
//!
//! # Invariants
//!
//! 1. Evaluation is a pure function of the progress value: identical inputs
//!    produce bit-identical outputs.
//! 2. Progress is sanitized into `[0, 1]` (NaN → 0) before any mapping runs.
//! 3. Keyframe mappings never extrapolate; see [`Keyframes::sample`].
//!
//! # Example
//!
//! ```
//! use debris_core::graph::{GraphBuilder, Mapping, Source};
//!
//! let mut builder = GraphBuilder::new();
//! let x = builder
//!     .track("image.x", Source::Progress, &[(0.0, 0.0), (1.0, -480.0)])
//!     .unwrap();
//! let half = builder
//!     .param("image.x.half", Source::Param(x), Mapping::Affine { scale: 0.5, offset: 0.0 })
//!     .unwrap();
//! let graph = builder.build();
//!
//! let values = graph.evaluate(0.5);
//! assert_eq!(values.get(x), Some(-240.0));
//! assert_eq!(values.get(half), Some(-120.0));
//! ```

use std::fmt;

use ahash::AHashMap;

use crate::animation::keyframes::{KeyframeError, Keyframes};

/// Handle to a parameter within one [`ParameterGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(u32);

impl ParamId {
    /// Position in evaluation order.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Reduction applied to a [`Source::Combine`] input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineOp {
    Sum,
    Product,
    Min,
    Max,
}

impl CombineOp {
    fn reduce(self, inputs: impl Iterator<Item = f64>) -> f64 {
        match self {
            Self::Sum => inputs.sum(),
            Self::Product => inputs.product(),
            Self::Min => inputs.fold(f64::INFINITY, f64::min),
            Self::Max => inputs.fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Where a parameter reads its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// The combined progress signal.
    Progress,
    /// The live output of an earlier parameter.
    Param(ParamId),
    /// A reduction over several earlier parameters.
    Combine(CombineOp, Vec<ParamId>),
}

/// How a parameter turns its input into an output.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapping {
    /// Piecewise interpolation over keyframes.
    Keyframes(Keyframes),
    /// Output equals input.
    Identity,
    /// `input × scale + offset`.
    Affine { scale: f64, offset: f64 },
    /// Ignores the input.
    Constant(f64),
}

impl Mapping {
    fn apply(&self, input: f64) -> f64 {
        match self {
            Self::Keyframes(track) => track.sample(input),
            Self::Identity => input,
            Self::Affine { scale, offset } => input * scale + offset,
            Self::Constant(value) => *value,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Self::Keyframes(_) | Self::Identity => true,
            Self::Affine { scale, offset } => scale.is_finite() && offset.is_finite(),
            Self::Constant(value) => value.is_finite(),
        }
    }
}

/// Graph construction failure.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A parameter with this name already exists.
    DuplicateName(String),
    /// `name` references a parameter that does not exist (yet).
    UnknownParam { name: String, id: ParamId },
    /// `name` combines an empty input list.
    EmptyCombine { name: String },
    /// `name` has a NaN or infinite affine/constant coefficient.
    NonFinite { name: String },
    /// `name` was given an invalid keyframe list.
    Keyframes { name: String, source: KeyframeError },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "parameter {name:?} is defined twice"),
            Self::UnknownParam { name, id } => {
                write!(f, "parameter {name:?} references unknown parameter {id}")
            }
            Self::EmptyCombine { name } => {
                write!(f, "parameter {name:?} combines an empty input list")
            }
            Self::NonFinite { name } => {
                write!(f, "parameter {name:?} has a non-finite coefficient")
            }
            Self::Keyframes { name, source } => write!(f, "parameter {name:?}: {source}"),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Keyframes { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    source: Source,
    mapping: Mapping,
}

/// Incrementally assembles a [`ParameterGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    by_name: AHashMap<String, ParamId>,
}

impl GraphBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parameters added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no parameters were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up an already-added parameter.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ParamId> {
        self.by_name.get(name).copied()
    }

    /// Add a parameter. It may only reference parameters added before it.
    pub fn param(
        &mut self,
        name: impl Into<String>,
        source: Source,
        mapping: Mapping,
    ) -> Result<ParamId, GraphError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(GraphError::DuplicateName(name));
        }
        let known = |id: ParamId| id.index() < self.nodes.len();
        match &source {
            Source::Progress => {}
            Source::Param(id) => {
                if !known(*id) {
                    return Err(GraphError::UnknownParam { name, id: *id });
                }
            }
            Source::Combine(_, inputs) => {
                if inputs.is_empty() {
                    return Err(GraphError::EmptyCombine { name });
                }
                if let Some(id) = inputs.iter().copied().find(|id| !known(*id)) {
                    return Err(GraphError::UnknownParam { name, id });
                }
            }
        }
        if !mapping.is_finite() {
            return Err(GraphError::NonFinite { name });
        }
        let id = ParamId(self.nodes.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.nodes.push(Node {
            name,
            source,
            mapping,
        });
        Ok(id)
    }

    /// Add a keyframed parameter from `(at, value)` pairs.
    pub fn track(
        &mut self,
        name: impl Into<String>,
        source: Source,
        stops: &[(f64, f64)],
    ) -> Result<ParamId, GraphError> {
        let name = name.into();
        let track = Keyframes::new(stops.iter().copied()).map_err(|source| {
            GraphError::Keyframes {
                name: name.clone(),
                source,
            }
        })?;
        self.param(name, source, Mapping::Keyframes(track))
    }

    /// Add a keyframed parameter with parallel input/output lists sharing
    /// one input table, as most channels of a debris group do.
    pub fn track_table(
        &mut self,
        name: impl Into<String>,
        source: Source,
        input: &[f64],
        output: &[f64],
    ) -> Result<ParamId, GraphError> {
        let name = name.into();
        let track = Keyframes::from_slices(input, output).map_err(|source| {
            GraphError::Keyframes {
                name: name.clone(),
                source,
            }
        })?;
        self.param(name, source, Mapping::Keyframes(track))
    }

    /// Add a parameter that ignores its input.
    pub fn constant(&mut self, name: impl Into<String>, value: f64) -> Result<ParamId, GraphError> {
        self.param(name, Source::Progress, Mapping::Constant(value))
    }

    /// Freeze the builder into an evaluable graph.
    #[must_use]
    pub fn build(self) -> ParameterGraph {
        ParameterGraph {
            nodes: self.nodes,
            by_name: self.by_name,
        }
    }
}

/// Immutable, topologically ordered parameter definitions.
#[derive(Debug, Clone)]
pub struct ParameterGraph {
    nodes: Vec<Node>,
    by_name: AHashMap<String, ParamId>,
}

impl ParameterGraph {
    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id for a parameter name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ParamId> {
        self.by_name.get(name).copied()
    }

    /// Name of a parameter.
    #[must_use]
    pub fn name(&self, id: ParamId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.name.as_str())
    }

    /// Whether `id` belongs to this graph.
    #[must_use]
    pub fn contains(&self, id: ParamId) -> bool {
        id.index() < self.nodes.len()
    }

    /// All ids in evaluation order.
    pub fn ids(&self) -> impl Iterator<Item = ParamId> + '_ {
        (0..self.nodes.len() as u32).map(ParamId)
    }

    /// Evaluate every parameter at `progress`.
    #[must_use]
    pub fn evaluate(&self, progress: f64) -> ParameterValues {
        let mut values = ParameterValues::with_capacity(self.nodes.len());
        self.evaluate_into(progress, &mut values);
        values
    }

    /// Evaluate into an existing buffer, reusing its allocation.
    pub fn evaluate_into(&self, progress: f64, out: &mut ParameterValues) {
        let progress = crate::unit(progress);
        out.progress = progress;
        out.values.clear();
        out.values.reserve(self.nodes.len());
        for node in &self.nodes {
            let input = match &node.source {
                Source::Progress => progress,
                // Builder guarantees earlier ids, so the slot is populated.
                Source::Param(id) => out.values[id.index()],
                Source::Combine(op, inputs) => {
                    op.reduce(inputs.iter().map(|id| out.values[id.index()]))
                }
            };
            out.values.push(node.mapping.apply(input));
        }
    }
}

/// Output of one [`ParameterGraph`] evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterValues {
    progress: f64,
    values: Vec<f64>,
}

impl ParameterValues {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            progress: 0.0,
            values: Vec::with_capacity(capacity),
        }
    }

    /// The sanitized progress this evaluation used.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Value of one parameter.
    #[inline]
    #[must_use]
    pub fn get(&self, id: ParamId) -> Option<f64> {
        self.values.get(id.index()).copied()
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(id, value)` pairs in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamId, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (ParamId(i as u32), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(builder: &mut GraphBuilder, name: &str) -> ParamId {
        builder
            .track(name, Source::Progress, &[(0.0, 0.0), (1.0, 100.0)])
            .unwrap()
    }

    #[test]
    fn evaluates_in_insertion_order() {
        let mut b = GraphBuilder::new();
        let a = ramp(&mut b, "a");
        let doubled = b
            .param(
                "a2",
                Source::Param(a),
                Mapping::Affine {
                    scale: 2.0,
                    offset: 1.0,
                },
            )
            .unwrap();
        let g = b.build();
        let v = g.evaluate(0.25);
        assert_eq!(v.get(a), Some(25.0));
        assert_eq!(v.get(doubled), Some(51.0));
        assert_eq!(v.progress(), 0.25);
    }

    #[test]
    fn combine_ops() {
        let mut b = GraphBuilder::new();
        let a = b.constant("a", 3.0).unwrap();
        let c = b.constant("c", -2.0).unwrap();
        let ids = vec![a, c];
        let sum = b
            .param("sum", Source::Combine(CombineOp::Sum, ids.clone()), Mapping::Identity)
            .unwrap();
        let product = b
            .param(
                "product",
                Source::Combine(CombineOp::Product, ids.clone()),
                Mapping::Identity,
            )
            .unwrap();
        let min = b
            .param("min", Source::Combine(CombineOp::Min, ids.clone()), Mapping::Identity)
            .unwrap();
        let max = b
            .param("max", Source::Combine(CombineOp::Max, ids), Mapping::Identity)
            .unwrap();
        let v = b.build().evaluate(0.0);
        assert_eq!(v.get(sum), Some(1.0));
        assert_eq!(v.get(product), Some(-6.0));
        assert_eq!(v.get(min), Some(-2.0));
        assert_eq!(v.get(max), Some(3.0));
    }

    #[test]
    fn composed_parameter_follows_derived_progress() {
        let mut b = GraphBuilder::new();
        let q = b
            .track(
                "question",
                Source::Progress,
                &[(0.5, 0.0), (0.65, 0.3), (0.85, 1.0), (1.0, 1.0)],
            )
            .unwrap();
        let text = b
            .track("text.x", Source::Param(q), &[(0.0, 0.0), (1.0, -360.0)])
            .unwrap();
        let g = b.build();
        assert_eq!(g.evaluate(0.3).get(text), Some(0.0));
        assert_eq!(g.evaluate(1.0).get(text), Some(-360.0));
    }

    #[test]
    fn progress_is_sanitized() {
        let mut b = GraphBuilder::new();
        let a = ramp(&mut b, "a");
        let g = b.build();
        assert_eq!(g.evaluate(f64::NAN).get(a), Some(0.0));
        assert_eq!(g.evaluate(-4.0).get(a), Some(0.0));
        assert_eq!(g.evaluate(9.0).get(a), Some(100.0));
        assert_eq!(g.evaluate(f64::INFINITY).progress(), 1.0);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut b = GraphBuilder::new();
        ramp(&mut b, "a");
        let err = b.constant("a", 1.0).unwrap_err();
        assert_eq!(err, GraphError::DuplicateName("a".into()));
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn rejects_forward_references() {
        let mut b = GraphBuilder::new();
        let err = b
            .param("late", Source::Param(ParamId(0)), Mapping::Identity)
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownParam { .. }));
        assert!(err.to_string().contains("P0"));
        let a = ramp(&mut b, "a");
        let err = b
            .param(
                "mix",
                Source::Combine(CombineOp::Sum, vec![a, ParamId(7)]),
                Mapping::Identity,
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownParam {
                name: "mix".into(),
                id: ParamId(7)
            }
        );
    }

    #[test]
    fn rejects_empty_combine_and_non_finite() {
        let mut b = GraphBuilder::new();
        assert_eq!(
            b.param("e", Source::Combine(CombineOp::Max, vec![]), Mapping::Identity),
            Err(GraphError::EmptyCombine { name: "e".into() })
        );
        assert_eq!(
            b.constant("n", f64::NAN),
            Err(GraphError::NonFinite { name: "n".into() })
        );
        assert!(b.is_empty());
    }

    #[test]
    fn keyframe_errors_carry_param_name() {
        let mut b = GraphBuilder::new();
        let err = b
            .track("bad", Source::Progress, &[(0.5, 0.0), (0.2, 1.0)])
            .unwrap_err();
        assert!(err.to_string().starts_with("parameter \"bad\""));
        assert!(std::error::Error::source(&err).is_some());
        let err = b
            .track_table("short", Source::Progress, &[0.0, 1.0], &[0.0])
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::Keyframes {
                source: KeyframeError::LengthMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn lookup_and_names() {
        let mut b = GraphBuilder::new();
        let a = ramp(&mut b, "video.scale");
        assert_eq!(b.lookup("video.scale"), Some(a));
        let g = b.build();
        assert_eq!(g.lookup("video.scale"), Some(a));
        assert_eq!(g.name(a), Some("video.scale"));
        assert_eq!(g.lookup("missing"), None);
        assert!(g.contains(a));
        assert!(!g.contains(ParamId(1)));
        assert_eq!(g.ids().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let mut b = GraphBuilder::new();
        let a = ramp(&mut b, "a");
        let g = b.build();
        let mut out = ParameterValues::default();
        g.evaluate_into(0.1, &mut out);
        g.evaluate_into(0.9, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(a), Some(90.0));
        assert_eq!(out, g.evaluate(0.9));
        assert_eq!(out.iter().collect::<Vec<_>>(), vec![(a, 90.0)]);
    }
}
