#![forbid(unsafe_code)]

//! Keyframe tracks: piecewise interpolation over `(progress, value)` stops.
//!
//! # Sampling
//!
//! Between two bracketing stops the value is interpolated linearly, after
//! shaping the local segment fraction with the track's [`Easing`]. Outside
//! the first/last stop the boundary value is returned unchanged: tracks
//! clamp, they never extrapolate.
//!
//! # Invariants
//!
//! 1. A track has at least one stop, every stop is finite, and stop
//!    positions are non-decreasing.
//! 2. `sample(x)` for `x < first.at` is `first.value`; for `x >= last.at`
//!    it is `last.value`; NaN samples like `x < first.at`.
//! 3. Repeated stop positions are allowed and create a hard step: input at
//!    exactly that position takes the last of the repeated stops.

use std::fmt;

use super::Easing;

/// One `(progress, value)` stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Input position.
    pub at: f64,
    /// Output value at `at`.
    pub value: f64,
}

/// Invalid keyframe list.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyframeError {
    /// No stops were supplied.
    Empty,
    /// Stop `index` has a NaN or infinite component.
    NonFinite { index: usize },
    /// Stop `index` sits before stop `index - 1`.
    Unordered { index: usize, at: f64, previous: f64 },
    /// Input and output lists differ in length.
    LengthMismatch { input: usize, output: usize },
}

impl fmt::Display for KeyframeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "keyframe track has no stops"),
            Self::NonFinite { index } => write!(f, "keyframe {index} is not finite"),
            Self::Unordered {
                index,
                at,
                previous,
            } => write!(
                f,
                "keyframe {index} at {at} precedes previous stop at {previous}"
            ),
            Self::LengthMismatch { input, output } => write!(
                f,
                "keyframe input has {input} positions but output has {output} values"
            ),
        }
    }
}

impl std::error::Error for KeyframeError {}

/// An immutable, validated keyframe track.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    stops: Vec<Keyframe>,
    easing: Easing,
}

impl Keyframes {
    /// Build a track from `(at, value)` pairs.
    pub fn new(stops: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, KeyframeError> {
        let stops: Vec<Keyframe> = stops
            .into_iter()
            .map(|(at, value)| Keyframe { at, value })
            .collect();
        if stops.is_empty() {
            return Err(KeyframeError::Empty);
        }
        for (index, stop) in stops.iter().enumerate() {
            if !stop.at.is_finite() || !stop.value.is_finite() {
                return Err(KeyframeError::NonFinite { index });
            }
            if index > 0 && stop.at < stops[index - 1].at {
                return Err(KeyframeError::Unordered {
                    index,
                    at: stop.at,
                    previous: stops[index - 1].at,
                });
            }
        }
        Ok(Self {
            stops,
            easing: Easing::Linear,
        })
    }

    /// Build a track from parallel input/output slices.
    pub fn from_slices(input: &[f64], output: &[f64]) -> Result<Self, KeyframeError> {
        if input.len() != output.len() {
            return Err(KeyframeError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        Self::new(input.iter().copied().zip(output.iter().copied()))
    }

    /// A single-stop track that always yields `value`.
    pub fn constant(value: f64) -> Result<Self, KeyframeError> {
        Self::new([(0.0, value)])
    }

    /// Set the per-segment easing (builder pattern).
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Per-segment easing.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// The stops, in order.
    #[must_use]
    pub fn stops(&self) -> &[Keyframe] {
        &self.stops
    }

    /// First stop.
    #[must_use]
    pub fn first(&self) -> Keyframe {
        self.stops[0]
    }

    /// Last stop.
    #[must_use]
    pub fn last(&self) -> Keyframe {
        self.stops[self.stops.len() - 1]
    }

    /// Smallest and largest output value across all stops.
    #[must_use]
    pub fn value_range(&self) -> (f64, f64) {
        self.stops
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), k| {
                (lo.min(k.value), hi.max(k.value))
            })
    }

    /// Interpolated value at `input`.
    #[must_use]
    pub fn sample(&self, input: f64) -> f64 {
        let first = self.first();
        let last = self.last();
        if input.is_nan() || input < first.at {
            return first.value;
        }
        if input >= last.at {
            return last.value;
        }
        // first.at <= input < last.at, so 1 <= hi <= len - 1.
        let hi = self.stops.partition_point(|k| k.at <= input);
        let a = self.stops[hi - 1];
        let b = self.stops[hi];
        let span = b.at - a.at;
        if span <= 0.0 {
            return b.value;
        }
        let t = self.easing.apply((input - a.at) / span);
        a.value + (b.value - a.value) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(pairs: &[(f64, f64)]) -> Keyframes {
        Keyframes::new(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn interpolates_linearly_between_stops() {
        let k = track(&[(0.0, 0.0), (0.5, 10.0), (1.0, 30.0)]);
        assert_eq!(k.sample(0.25), 5.0);
        assert_eq!(k.sample(0.5), 10.0);
        assert_eq!(k.sample(0.75), 20.0);
    }

    #[test]
    fn clamps_outside_range() {
        let k = track(&[(0.25, -480.0), (0.7, 200.0)]);
        assert_eq!(k.sample(0.0), -480.0);
        assert_eq!(k.sample(-5.0), -480.0);
        assert_eq!(k.sample(1.0), 200.0);
        assert_eq!(k.sample(42.0), 200.0);
        assert_eq!(k.sample(f64::INFINITY), 200.0);
        assert_eq!(k.sample(f64::NEG_INFINITY), -480.0);
    }

    #[test]
    fn nan_samples_first_stop() {
        let k = track(&[(0.0, 3.0), (1.0, 9.0)]);
        assert_eq!(k.sample(f64::NAN), 3.0);
    }

    #[test]
    fn repeated_stop_is_a_step() {
        let k = track(&[(0.0, 0.0), (0.5, 1.0), (0.5, 5.0), (1.0, 5.0)]);
        assert_eq!(k.sample(0.5), 5.0);
        assert!(k.sample(0.4999) < 1.0);
    }

    #[test]
    fn easing_shapes_segments() {
        let k = track(&[(0.0, 0.0), (1.0, 100.0)]).with_easing(Easing::EaseIn);
        assert_eq!(k.sample(0.5), 25.0);
    }

    #[test]
    fn single_stop_is_constant() {
        let k = Keyframes::constant(7.0).unwrap();
        for x in [-1.0, 0.0, 0.5, 3.0] {
            assert_eq!(k.sample(x), 7.0);
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            Keyframes::new(Vec::<(f64, f64)>::new()),
            Err(KeyframeError::Empty)
        );
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(
            Keyframes::new([(0.0, 1.0), (f64::NAN, 2.0)]),
            Err(KeyframeError::NonFinite { index: 1 })
        );
        assert_eq!(
            Keyframes::new([(0.0, f64::INFINITY)]),
            Err(KeyframeError::NonFinite { index: 0 })
        );
    }

    #[test]
    fn rejects_decreasing_positions() {
        let err = Keyframes::new([(0.0, 0.0), (0.6, 1.0), (0.4, 2.0)]).unwrap_err();
        assert!(matches!(err, KeyframeError::Unordered { index: 2, .. }));
        assert!(err.to_string().contains("keyframe 2"));
    }

    #[test]
    fn from_slices_requires_equal_lengths() {
        assert_eq!(
            Keyframes::from_slices(&[0.0, 1.0], &[1.0]),
            Err(KeyframeError::LengthMismatch {
                input: 2,
                output: 1
            })
        );
        let k = Keyframes::from_slices(&[0.0, 1.0], &[2.0, 4.0]).unwrap();
        assert_eq!(k.sample(0.5), 3.0);
    }

    #[test]
    fn value_range_spans_stops() {
        let k = track(&[(0.0, 0.4), (0.5, 5.5), (1.0, -1.0)]);
        assert_eq!(k.value_range(), (-1.0, 5.5));
    }
}
