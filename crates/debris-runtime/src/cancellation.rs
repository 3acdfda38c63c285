#![forbid(unsafe_code)]

//! Single-threaded cancellation tokens used as liveness guards.
//!
//! The engine runs inside host callbacks on one thread, so a shared
//! `Rc<Cell<bool>>` is enough. Anything that may run after teardown (a
//! scheduled frame, a settle timer, a host closure holding an engine
//! handle) checks its token before writing state or scheduling work.
//!
//! # Example
//!
//! ```
//! use debris_runtime::cancellation::CancellationSource;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//! assert!(!token.is_cancelled());
//! source.cancel();
//! assert!(token.is_cancelled());
//! ```

use std::cell::Cell;
use std::rc::Rc;

/// A cloneable view of a [`CancellationSource`].
#[derive(Debug, Clone)]
pub struct CancellationToken {
    flag: Rc<Cell<bool>>,
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does **not** cancel its tokens; call
/// [`cancel`](Self::cancel) explicitly.
#[derive(Debug)]
pub struct CancellationSource {
    flag: Rc<Cell<bool>>,
}

impl CancellationSource {
    /// A source with an uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Rc::new(Cell::new(false)),
        }
    }

    /// Obtain a token observing this source.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            flag: Rc::clone(&self.flag),
        }
    }

    /// Signal cancellation. Returns `false` if it was already cancelled.
    pub fn cancel(&self) -> bool {
        !self.flag.replace(true)
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.get()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// Returns `true` once cancellation has been requested.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.get()
    }

    /// Returns `true` while not cancelled.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_observe_source() {
        let source = CancellationSource::new();
        let a = source.token();
        let b = a.clone();
        assert!(a.is_live());
        assert!(source.cancel());
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        assert!(source.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let source = CancellationSource::default();
        assert!(source.cancel());
        assert!(!source.cancel());
        assert!(source.token().is_cancelled());
    }

    #[test]
    fn dropping_source_does_not_cancel() {
        let source = CancellationSource::new();
        let token = source.token();
        drop(source);
        assert!(token.is_live());
    }
}
