#![forbid(unsafe_code)]

//! Core: time-free math for the debris scroll handoff.
//!
//! # Role in debris
//! `debris-core` owns every pure function the engine needs: easing curves,
//! the spring filter that smooths scroll progress, the fixed-duration tween
//! used for autonomous playback, keyframe interpolation, and the
//! [`ParameterGraph`](graph::ParameterGraph) that maps one progress scalar to
//! dozens of animatable values.
//!
//! # Primary responsibilities
//! - **Animation primitives**: [`Animation`](animation::Animation),
//!   [`Spring`](animation::spring::Spring), [`Tween`](animation::tween::Tween).
//! - **Keyframes**: validated `(progress, value)` stops with clamped sampling.
//! - **Parameter Graph**: explicit dependency graph, evaluated in insertion
//!   (topological) order.
//! - **Transforms and scatter**: grouping parameters into visual transforms
//!   and bounding terminal values into a dispersed resting state.
//! - **Scroll geometry**: viewport-relative progress of a tracked region.
//!
//! # How it fits in the system
//! `debris-runtime` drives these types from host scroll and frame events. Nothing
//! in this crate reads a clock, logs, or mutates shared state, so identical
//! inputs always produce identical outputs.

pub mod animation;
pub mod geometry;
pub mod graph;
pub mod scatter;
pub mod scene;
pub mod scroll;
pub mod transform;

pub use animation::keyframes::{Keyframe, KeyframeError, Keyframes};
pub use animation::{Animation, Easing};
pub use geometry::{Bounds, Viewport};
pub use graph::{GraphBuilder, GraphError, Mapping, ParamId, ParameterGraph, ParameterValues};
pub use scatter::{ScatterBounds, ScatterRule};
pub use scene::Scene;
pub use scroll::{Edge, Intersection, RegionMetrics, ScrollRange};
pub use transform::{Channel, Transform, TransformGroup};

/// Replace NaN with `fallback` and clamp into `[lo, hi]`.
///
/// Every externally sourced scalar passes through here before it touches
/// engine state. Infinities clamp to the nearest bound.
#[inline]
#[must_use]
pub fn sanitize(value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback.clamp(lo, hi)
    } else {
        value.clamp(lo, hi)
    }
}

/// [`sanitize`] into the unit interval with a NaN fallback of 0.
#[inline]
#[must_use]
pub fn unit(value: f64) -> f64 {
    sanitize(value, 0.0, 1.0, 0.0)
}
