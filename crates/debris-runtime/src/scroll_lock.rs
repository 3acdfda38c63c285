#![forbid(unsafe_code)]

//! Resource Lock Manager: exclusive ownership of the host's scroll flag.
//!
//! A [`ScrollLock`] is an RAII handle: creating it disables user scrolling
//! on the host, dropping or [`release`](ScrollLock::release)-ing it restores
//! scrolling. Release is idempotent. [`ScrollLockManager`] is the single
//! writer for one engine: at most one lock outstanding at a time, released
//! unconditionally on dispose.
//!
//! While a lock is held the host's capture-phase input handler asks
//! [`ScrollLockManager::suppresses`] whether to cancel wheel, touch and
//! scroll-key events.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::Dispose;

/// The host side of the lock.
pub trait ScrollHost {
    /// Enable or disable user-driven document scrolling.
    fn set_scroll_enabled(&self, enabled: bool);
}

/// Keys that scroll the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollKey {
    Space,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    Home,
    End,
}

impl ScrollKey {
    /// Parse a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            " " | "Space" | "Spacebar" => Self::Space,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            _ => return None,
        })
    }
}

/// An input event as seen by the host's capture-phase handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostInput {
    Wheel { delta_y: f64 },
    TouchMove,
    Key(ScrollKey),
    /// Any other key or pointer event.
    Other,
}

impl HostInput {
    /// Classify a DOM key value.
    #[must_use]
    pub fn key(key: &str) -> Self {
        ScrollKey::from_key(key).map_or(Self::Other, Self::Key)
    }

    /// Whether this input would scroll the document.
    #[must_use]
    pub fn scrolls(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// RAII scroll lock. Scrolling is disabled while this value is held.
pub struct ScrollLock {
    host: Rc<dyn ScrollHost>,
    held: bool,
}

impl ScrollLock {
    /// Disable scrolling on `host`.
    #[must_use]
    pub fn acquire(host: Rc<dyn ScrollHost>) -> Self {
        host.set_scroll_enabled(false);
        debug!(target: "debris.lock", "scroll lock acquired");
        Self { host, held: true }
    }

    /// Re-enable scrolling. Returns `false` if already released.
    pub fn release(&mut self) -> bool {
        if !self.held {
            return false;
        }
        self.held = false;
        self.host.set_scroll_enabled(true);
        debug!(target: "debris.lock", "scroll lock released");
        true
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("held", &self.held)
            .finish_non_exhaustive()
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Single writer of the scroll flag for one engine instance.
pub struct ScrollLockManager {
    host: Rc<dyn ScrollHost>,
    lock: Option<ScrollLock>,
    acquires: u64,
    releases: u64,
    disposed: bool,
}

impl ScrollLockManager {
    #[must_use]
    pub fn new(host: Rc<dyn ScrollHost>) -> Self {
        Self {
            host,
            lock: None,
            acquires: 0,
            releases: 0,
            disposed: false,
        }
    }

    /// Take the lock. No-op (returns `false`) if held or disposed.
    pub fn acquire(&mut self) -> bool {
        if self.disposed || self.is_held() {
            return false;
        }
        self.lock = Some(ScrollLock::acquire(Rc::clone(&self.host)));
        self.acquires += 1;
        true
    }

    /// Give the lock back. Calling this while not held is a no-op.
    pub fn release(&mut self) -> bool {
        match self.lock.take() {
            Some(mut lock) => {
                let released = lock.release();
                if released {
                    self.releases += 1;
                }
                released
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.lock.as_ref().is_some_and(ScrollLock::is_held)
    }

    /// Whether the capture-phase handler should cancel `input`.
    #[must_use]
    pub fn suppresses(&self, input: &HostInput) -> bool {
        self.is_held() && input.scrolls()
    }

    /// Lifetime acquire count.
    #[must_use]
    pub fn acquires(&self) -> u64 {
        self.acquires
    }

    /// Lifetime release count.
    #[must_use]
    pub fn releases(&self) -> u64 {
        self.releases
    }
}

impl fmt::Debug for ScrollLockManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockManager")
            .field("held", &self.is_held())
            .field("acquires", &self.acquires)
            .field("releases", &self.releases)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl Dispose for ScrollLockManager {
    fn dispose(&mut self) {
        self.release();
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for ScrollLockManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Recorder {
        enabled: Cell<bool>,
        calls: RefCell<Vec<bool>>,
    }

    impl ScrollHost for Recorder {
        fn set_scroll_enabled(&self, enabled: bool) {
            self.enabled.set(enabled);
            self.calls.borrow_mut().push(enabled);
        }
    }

    fn host() -> Rc<Recorder> {
        Rc::new(Recorder {
            enabled: Cell::new(true),
            ..Recorder::default()
        })
    }

    #[test]
    fn raii_lock_releases_on_drop() {
        let h = host();
        {
            let lock = ScrollLock::acquire(h.clone());
            assert!(lock.is_held());
            assert!(!h.enabled.get());
        }
        assert!(h.enabled.get());
        assert_eq!(*h.calls.borrow(), vec![false, true]);
    }

    #[test]
    fn release_is_idempotent() {
        let h = host();
        let mut lock = ScrollLock::acquire(h.clone());
        assert!(lock.release());
        assert!(!lock.release());
        drop(lock);
        assert_eq!(*h.calls.borrow(), vec![false, true]);
    }

    #[test]
    fn manager_allows_one_outstanding_lock() {
        let h = host();
        let mut m = ScrollLockManager::new(h.clone());
        assert!(m.acquire());
        assert!(!m.acquire());
        assert_eq!(m.acquires(), 1);
        assert!(m.release());
        assert!(!m.release());
        assert_eq!(m.releases(), 1);
        assert_eq!(*h.calls.borrow(), vec![false, true]);
    }

    #[test]
    fn dispose_releases_and_blocks_reacquire() {
        let h = host();
        let mut m = ScrollLockManager::new(h.clone());
        m.acquire();
        m.dispose();
        assert!(h.enabled.get());
        assert!(m.is_disposed());
        assert!(!m.acquire());
        m.dispose();
        assert_eq!(m.releases(), 1);
    }

    #[test]
    fn drop_releases_held_lock() {
        let h = host();
        {
            let mut m = ScrollLockManager::new(h.clone());
            m.acquire();
        }
        assert!(h.enabled.get());
    }

    #[test]
    fn suppression_only_while_held() {
        let h = host();
        let mut m = ScrollLockManager::new(h);
        let wheel = HostInput::Wheel { delta_y: 120.0 };
        assert!(!m.suppresses(&wheel));
        m.acquire();
        assert!(m.suppresses(&wheel));
        assert!(m.suppresses(&HostInput::TouchMove));
        assert!(m.suppresses(&HostInput::key(" ")));
        assert!(m.suppresses(&HostInput::key("End")));
        assert!(!m.suppresses(&HostInput::key("a")));
        assert!(!m.suppresses(&HostInput::Other));
    }

    #[test]
    fn key_parsing() {
        assert_eq!(ScrollKey::from_key("PageDown"), Some(ScrollKey::PageDown));
        assert_eq!(ScrollKey::from_key("ArrowUp"), Some(ScrollKey::ArrowUp));
        assert_eq!(ScrollKey::from_key("Enter"), None);
    }
}
