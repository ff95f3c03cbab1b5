//! Effects with cleanup.
//!
//! A transformer pass mutates a document it does not own. Each pass returns a
//! [`Cleanup`] that undoes its side effects (listeners, mounted nodes), and the
//! owning [`Effect`] runs it before the next pass or on teardown.
//!
//! ```ignore
//! let mut effect = Effect::new();
//! if effect.begin(&deps, false) {
//!     let mut cleanup = Cleanup::new();
//!     let id = link.add_event_listener(EventType::Click, ListenerOptions::default(), on_click);
//!     let dom = link.owner().clone();
//!     cleanup.push(move || { dom.remove_event_listener(id); });
//!     effect.finish(cleanup);
//! }
//! ```

use std::fmt;

/// Ordered teardown callbacks for one pass.
#[derive(Default)]
pub struct Cleanup {
    callbacks: Vec<Box<dyn FnOnce()>>,
}

impl Cleanup {
    /// Create an empty cleanup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a teardown callback.
    pub fn push(&mut self, callback: impl FnOnce() + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Move all callbacks of `other` after this one's.
    pub fn extend(&mut self, mut other: Self) {
        self.callbacks.append(&mut other.callbacks);
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run all callbacks in registration order.
    pub fn run(self) {
        for callback in self.callbacks {
            callback();
        }
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleanup")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Re-runs a pass when its dependencies change.
///
/// The pending cleanup always runs before a new pass starts and when the
/// effect is torn down or dropped.
pub struct Effect<D> {
    deps: Option<D>,
    cleanup: Option<Cleanup>,
}

impl<D> Default for Effect<D> {
    fn default() -> Self {
        Self {
            deps: None,
            cleanup: None,
        }
    }
}

impl<D: Clone + PartialEq> Effect<D> {
    /// Create an effect that has never run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pass for `deps`.
    ///
    /// Returns `false` when `deps` equal the previous pass's and `force` is
    /// not set; nothing is touched then. Otherwise the previous cleanup runs,
    /// `deps` are recorded and the caller performs the pass.
    pub fn begin(&mut self, deps: &D, force: bool) -> bool {
        if !force && self.deps.as_ref() == Some(deps) {
            return false;
        }
        self.run_cleanup();
        self.deps = Some(deps.clone());
        true
    }

    /// Store the cleanup of the pass started by [`Effect::begin`].
    pub fn finish(&mut self, cleanup: Cleanup) {
        if let Some(stale) = self.cleanup.replace(cleanup) {
            stale.run();
        }
    }

    /// Run a synchronous pass if `deps` changed (or `force` is set).
    ///
    /// Returns whether the pass ran.
    ///
    /// # Errors
    ///
    /// Propagates the pass error. Cleanup registered before the failure is
    /// kept and runs with the next pass.
    pub fn run<E>(
        &mut self,
        deps: &D,
        force: bool,
        pass: impl FnOnce(&D, &mut Cleanup) -> Result<(), E>,
    ) -> Result<bool, E> {
        if !self.begin(deps, force) {
            return Ok(false);
        }
        let mut cleanup = Cleanup::new();
        let result = pass(deps, &mut cleanup);
        self.finish(cleanup);
        result.map(|()| true)
    }

    /// Dependencies of the last pass.
    #[must_use]
    pub fn deps(&self) -> Option<&D> {
        self.deps.as_ref()
    }

    /// Run the pending cleanup and forget the dependencies.
    pub fn teardown(&mut self) {
        self.run_cleanup();
        self.deps = None;
    }

    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.run();
        }
    }
}

impl<D> Drop for Effect<D> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.run();
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for Effect<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("deps", &self.deps)
            .field("cleanup", &self.cleanup)
            .finish()
    }
}
