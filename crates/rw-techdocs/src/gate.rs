//! Loading gate for transformers that hide their children while working.

use std::cell::Cell;
use std::rc::Rc;

/// Loading/ready flag owned by a transformer.
///
/// A new gate is loading until its first pass completes.
#[derive(Debug, Default)]
pub struct Gate {
    ready: Rc<Cell<bool>>,
}

impl Gate {
    /// Create a gate in the loading state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a pass as in flight.
    pub fn set_loading(&self) {
        self.ready.set(false);
    }

    /// Mark the pass as complete.
    pub fn set_ready(&self) {
        self.ready.set(true);
    }

    /// Whether the last pass completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Read-only handle sharing this gate's state.
    #[must_use]
    pub fn handle(&self) -> GateHandle {
        GateHandle {
            ready: Rc::clone(&self.ready),
        }
    }
}

/// Read-only view of a [`Gate`].
#[derive(Debug, Clone)]
pub struct GateHandle {
    ready: Rc<Cell<bool>>,
}

impl GateHandle {
    /// Whether the gate is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// `Some(children)` once ready, `None` while loading.
    #[must_use]
    pub fn render<T>(&self, children: T) -> Option<T> {
        self.is_ready().then_some(children)
    }
}
