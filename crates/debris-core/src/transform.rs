#![forbid(unsafe_code)]

//! Visual transforms assembled from graph parameters.

use std::fmt;

use crate::graph::{ParamId, ParameterValues};
use crate::scatter::ScatterRule;

/// One animatable property of a rendered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    X,
    Y,
    Rotate,
    Scale,
    SkewX,
    SkewY,
    Opacity,
    RotateX,
    RotateY,
    Z,
}

impl Channel {
    /// Every channel, in slot order.
    pub const ALL: [Channel; 10] = [
        Channel::X,
        Channel::Y,
        Channel::Rotate,
        Channel::Scale,
        Channel::SkewX,
        Channel::SkewY,
        Channel::Opacity,
        Channel::RotateX,
        Channel::RotateY,
        Channel::Z,
    ];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }

    /// Lower-case name used in logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
            Self::SkewX => "skew_x",
            Self::SkewY => "skew_y",
            Self::Opacity => "opacity",
            Self::RotateX => "rotate_x",
            Self::RotateY => "rotate_y",
            Self::Z => "z",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved transform of one group. Offsets are in pixels, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub rotate: f64,
    pub scale: f64,
    pub skew_x: f64,
    pub skew_y: f64,
    pub opacity: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub z: f64,
}

impl Transform {
    /// No offset, no rotation, unit scale, fully opaque.
    pub const IDENTITY: Transform = Transform {
        x: 0.0,
        y: 0.0,
        rotate: 0.0,
        scale: 1.0,
        skew_x: 0.0,
        skew_y: 0.0,
        opacity: 1.0,
        rotate_x: 0.0,
        rotate_y: 0.0,
        z: 0.0,
    };

    /// Read one channel.
    #[must_use]
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::X => self.x,
            Channel::Y => self.y,
            Channel::Rotate => self.rotate,
            Channel::Scale => self.scale,
            Channel::SkewX => self.skew_x,
            Channel::SkewY => self.skew_y,
            Channel::Opacity => self.opacity,
            Channel::RotateX => self.rotate_x,
            Channel::RotateY => self.rotate_y,
            Channel::Z => self.z,
        }
    }

    /// Write one channel.
    pub fn set(&mut self, channel: Channel, value: f64) {
        let slot = match channel {
            Channel::X => &mut self.x,
            Channel::Y => &mut self.y,
            Channel::Rotate => &mut self.rotate,
            Channel::Scale => &mut self.scale,
            Channel::SkewX => &mut self.skew_x,
            Channel::SkewY => &mut self.skew_y,
            Channel::Opacity => &mut self.opacity,
            Channel::RotateX => &mut self.rotate_x,
            Channel::RotateY => &mut self.rotate_y,
            Channel::Z => &mut self.z,
        };
        *slot = value;
    }

    /// Every channel is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        Channel::ALL.iter().all(|c| self.get(*c).is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A named rendered group: channel bindings plus an optional scatter rule.
///
/// Groups with a scatter rule are debris and are captured at freeze time.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformGroup {
    name: String,
    bindings: [Option<ParamId>; 10],
    scatter: Option<ScatterRule>,
}

impl TransformGroup {
    /// Group with every channel at identity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: [None; 10],
            scatter: None,
        }
    }

    /// Bind `channel` to a parameter (builder pattern).
    #[must_use]
    pub fn bind(mut self, channel: Channel, param: ParamId) -> Self {
        self.bindings[channel.slot()] = Some(param);
        self
    }

    /// Mark as debris with `rule` (builder pattern).
    #[must_use]
    pub fn scatter(mut self, rule: ScatterRule) -> Self {
        self.scatter = Some(rule);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter bound to `channel`, if any.
    #[must_use]
    pub fn binding(&self, channel: Channel) -> Option<ParamId> {
        self.bindings[channel.slot()]
    }

    /// Every bound `(channel, param)` pair.
    pub fn bindings(&self) -> impl Iterator<Item = (Channel, ParamId)> + '_ {
        Channel::ALL
            .iter()
            .filter_map(|c| self.binding(*c).map(|p| (*c, p)))
    }

    #[must_use]
    pub fn scatter_rule(&self) -> Option<&ScatterRule> {
        self.scatter.as_ref()
    }

    /// Whether this group is captured into the debris snapshot.
    #[must_use]
    pub fn is_debris(&self) -> bool {
        self.scatter.is_some()
    }

    /// Current transform. Unbound or missing channels stay at identity.
    #[must_use]
    pub fn resolve(&self, values: &ParameterValues) -> Transform {
        let mut t = Transform::IDENTITY;
        for (channel, param) in self.bindings() {
            if let Some(v) = values.get(param) {
                t.set(channel, v);
            }
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, Source};

    #[test]
    fn get_set_cover_every_channel() {
        let mut t = Transform::IDENTITY;
        for (i, c) in Channel::ALL.iter().enumerate() {
            t.set(*c, i as f64 + 0.5);
        }
        for (i, c) in Channel::ALL.iter().enumerate() {
            assert_eq!(t.get(*c), i as f64 + 0.5, "{c}");
        }
        assert!(t.is_finite());
        t.set(Channel::Z, f64::NAN);
        assert!(!t.is_finite());
    }

    #[test]
    fn unbound_channels_resolve_to_identity() {
        let mut b = GraphBuilder::new();
        let x = b
            .track("x", Source::Progress, &[(0.0, 0.0), (1.0, -480.0)])
            .unwrap();
        let g = b.build();
        let group = TransformGroup::new("primary.0").bind(Channel::X, x);
        let t = group.resolve(&g.evaluate(1.0));
        assert_eq!(t.x, -480.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.opacity, 1.0);
        assert_eq!(t.z, 0.0);
        assert!(!group.is_debris());
    }

    #[test]
    fn bindings_in_channel_order() {
        let mut b = GraphBuilder::new();
        let o = b.constant("o", 0.5).unwrap();
        let s = b.constant("s", 2.0).unwrap();
        let group = TransformGroup::new("g")
            .bind(Channel::Opacity, o)
            .bind(Channel::Scale, s)
            .scatter(ScatterRule::side(0));
        let pairs: Vec<_> = group.bindings().collect();
        assert_eq!(pairs, vec![(Channel::Scale, s), (Channel::Opacity, o)]);
        assert!(group.is_debris());
        assert_eq!(group.name(), "g");
    }

    #[test]
    fn channel_names() {
        assert_eq!(Channel::SkewX.to_string(), "skew_x");
        assert_eq!(Channel::ALL.len(), 10);
    }
}
