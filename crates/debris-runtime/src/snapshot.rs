#![forbid(unsafe_code)]

//! Snapshot Store: write-once capture of the debris resting state.
//!
//! On playback completion the engine hands the store the terminal
//! parameter values. For every debris group the store resolves the
//! terminal transform, scatters it into the group's bounding box and keeps
//! both. Entries are never overwritten; after the first capture the store
//! is sealed and further captures are no-ops.

use std::collections::BTreeMap;

use debris_core::geometry::Viewport;
use debris_core::graph::ParameterValues;
use debris_core::scatter::ScatterBounds;
use debris_core::scene::Scene;
use debris_core::transform::Transform;
use tracing::debug;

/// One frozen debris group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebrisEntry {
    pub group: String,
    /// Transform at progress 1.0, before scattering.
    pub terminal: Transform,
    /// Scattered, bounds-clamped resting transform.
    pub rest: Transform,
}

/// Result of [`SnapshotStore::capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// First capture; `groups` entries written.
    Captured { groups: usize },
    /// The store was already sealed; nothing written.
    AlreadySealed,
}

/// Write-once map from debris group to its frozen transform.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    entries: BTreeMap<String, DebrisEntry>,
    sealed: bool,
    viewport: Option<Viewport>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every debris group of `scene` from `values`.
    pub fn capture(
        &mut self,
        scene: &Scene,
        values: &ParameterValues,
        viewport: Viewport,
        bounds: &ScatterBounds,
    ) -> CaptureOutcome {
        if self.sealed {
            debug!(target: "debris.snapshot", "capture skipped: already sealed");
            return CaptureOutcome::AlreadySealed;
        }
        let viewport = viewport.or_fallback();
        let mut written = 0;
        for group in scene.debris_groups() {
            if self.entries.contains_key(group.name()) {
                continue;
            }
            let terminal = group.resolve(values);
            let rest = group
                .scatter_rule()
                .map_or(terminal, |rule| rule.apply(&terminal, viewport, bounds));
            self.entries.insert(
                group.name().to_owned(),
                DebrisEntry {
                    group: group.name().to_owned(),
                    terminal,
                    rest,
                },
            );
            written += 1;
        }
        self.sealed = true;
        self.viewport = Some(viewport);
        debug!(
            target: "debris.snapshot",
            groups = written,
            width = viewport.width,
            height = viewport.height,
            "debris captured"
        );
        CaptureOutcome::Captured { groups: written }
    }

    #[must_use]
    pub fn get(&self, group: &str) -> Option<&DebrisEntry> {
        self.entries.get(group)
    }

    /// Resting transform for `group`, if captured.
    #[must_use]
    pub fn rest(&self, group: &str) -> Option<Transform> {
        self.entries.get(group).map(|e| e.rest)
    }

    /// Entries in group-name order.
    pub fn entries(&self) -> impl Iterator<Item = &DebrisEntry> + '_ {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Viewport the capture was scattered against.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debris_core::scene::presets::hero_explosion;

    const VIEW: Viewport = Viewport {
        width: 1920.0,
        height: 1080.0,
    };

    #[test]
    fn captures_every_debris_group_once() {
        let scene = hero_explosion().unwrap();
        let values = scene.evaluate(1.0);
        let mut store = SnapshotStore::new();
        let outcome = store.capture(&scene, &values, VIEW, &ScatterBounds::default());
        assert_eq!(outcome, CaptureOutcome::Captured { groups: 12 });
        assert_eq!(store.len(), 12);
        assert!(store.is_sealed());
        assert!(store.get("video").is_none());
        assert!(store.rest("side.3").is_some());
        assert_eq!(store.viewport(), Some(VIEW));
    }

    #[test]
    fn later_captures_never_overwrite() {
        let scene = hero_explosion().unwrap();
        let mut store = SnapshotStore::new();
        store.capture(&scene, &scene.evaluate(1.0), VIEW, &ScatterBounds::default());
        let before: Vec<DebrisEntry> = store.entries().cloned().collect();

        let other = Viewport::new(800.0, 600.0);
        let outcome = store.capture(&scene, &scene.evaluate(0.1), other, &ScatterBounds::default());
        assert_eq!(outcome, CaptureOutcome::AlreadySealed);
        let after: Vec<DebrisEntry> = store.entries().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(store.viewport(), Some(VIEW));
    }

    #[test]
    fn rest_stays_inside_group_bounds() {
        let scene = hero_explosion().unwrap();
        let base = ScatterBounds::default();
        let mut store = SnapshotStore::new();
        store.capture(&scene, &scene.evaluate(1.0), VIEW, &base);
        for group in scene.debris_groups() {
            let entry = store.get(group.name()).unwrap();
            let bounds = group.scatter_rule().unwrap().bounds(VIEW, &base);
            assert!(bounds.contains(entry.rest.x, entry.rest.y), "{}", entry.group);
            assert!(entry.rest.is_finite());
            assert_eq!(entry.rest.rotate, entry.terminal.rotate);
        }
    }

    #[test]
    fn empty_viewport_falls_back() {
        let scene = hero_explosion().unwrap();
        let mut store = SnapshotStore::new();
        store.capture(
            &scene,
            &scene.evaluate(1.0),
            Viewport::new(0.0, 0.0),
            &ScatterBounds::default(),
        );
        assert_eq!(store.viewport(), Some(Viewport::FALLBACK));
    }
}
