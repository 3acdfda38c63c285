#![forbid(unsafe_code)]

//! Deterministic time and stable digests for scenario runs.
//!
//! A run never reads wall-clock deltas: frame timestamps are derived from a
//! fixed origin plus an accumulated virtual offset, so the same scenario and
//! step always yields the same frame deltas and the same frozen debris.

use std::time::Duration;

use debris_core::Channel;
use debris_runtime::SnapshotStore;
use web_time::Instant;

/// Virtual frame clock anchored at a real origin instant.
#[derive(Debug, Clone)]
pub struct VirtualClock {
    origin: Instant,
    elapsed: Duration,
    step: Duration,
}

impl VirtualClock {
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            step,
        }
    }

    /// Advance by one step and return the new frame timestamp.
    pub fn tick(&mut self) -> Instant {
        self.elapsed += self.step;
        self.now()
    }

    /// Timestamp at the current virtual offset.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Virtual milliseconds since the origin.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    #[must_use]
    pub fn step(&self) -> Duration {
        self.step
    }
}

/// `blake3:<hex>` over every captured entry, in group-name order.
///
/// Floats are hashed by bit pattern, so two digests match only when the
/// snapshots are bit-identical.
#[must_use]
pub fn debris_digest(store: &SnapshotStore) -> String {
    let mut hasher = blake3::Hasher::new();
    for entry in store.entries() {
        hasher.update(entry.group.as_bytes());
        hasher.update(&[0]);
        for t in [&entry.terminal, &entry.rest] {
            for channel in Channel::ALL {
                hasher.update(&t.get(channel).to_bits().to_le_bytes());
            }
        }
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use debris_core::geometry::Viewport;
    use debris_core::scene::presets::hero_explosion;
    use debris_core::ScatterBounds;

    #[test]
    fn clock_steps_are_exact() {
        let mut clock = VirtualClock::new(Duration::from_millis(16));
        let first = clock.tick();
        let second = clock.tick();
        assert_eq!(second - first, Duration::from_millis(16));
        assert_eq!(clock.now_ms(), 32);
        assert_eq!(clock.now(), second);
    }

    #[test]
    fn digest_is_stable_and_sensitive() {
        let scene = hero_explosion().unwrap();
        let capture = |progress: f64| {
            let mut store = SnapshotStore::new();
            store.capture(
                &scene,
                &scene.evaluate(progress),
                Viewport::new(1440.0, 900.0),
                &ScatterBounds::default(),
            );
            store
        };
        let a = debris_digest(&capture(1.0));
        assert_eq!(a, debris_digest(&capture(1.0)));
        assert!(a.starts_with("blake3:"));
        assert_eq!(a.len(), "blake3:".len() + 64);
        assert_ne!(a, debris_digest(&capture(0.4)));
        assert_ne!(a, debris_digest(&SnapshotStore::new()));
    }
}
