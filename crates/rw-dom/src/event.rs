//! Events and listener registrations.
//!
//! Dispatch is target-only: listeners registered on the target element run in
//! registration order, and nothing bubbles to ancestors.

use std::fmt;
use std::rc::Rc;

use crate::dom::Element;

/// Kind of event delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Pointer activation (`click`).
    Click,
    /// Resource finished loading (`load`).
    Load,
    /// Resource failed to load (`error`).
    Error,
    /// Any other event name.
    Custom(String),
}

impl EventType {
    /// DOM event name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Load => "load",
            Self::Error => "error",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyboard modifiers held while the event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Control key.
    pub ctrl: bool,
    /// Meta (command/windows) key.
    pub meta: bool,
    /// Shift key.
    pub shift: bool,
    /// Alt/option key.
    pub alt: bool,
}

/// A dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_type: EventType,
    modifiers: Modifiers,
    default_prevented: bool,
}

impl Event {
    /// Create an event of the given type with no modifiers.
    #[must_use]
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            modifiers: Modifiers::default(),
            default_prevented: false,
        }
    }

    /// Click event.
    #[must_use]
    pub fn click() -> Self {
        Self::new(EventType::Click)
    }

    /// Load event.
    #[must_use]
    pub fn load() -> Self {
        Self::new(EventType::Load)
    }

    /// Set modifier keys.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Event type.
    #[must_use]
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// Modifier keys.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Cancel the default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a listener cancelled the default action.
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Identifier of a registered listener, unique within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Options for [`Element::add_event_listener`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Remove the listener before its first invocation.
    pub once: bool,
}

impl ListenerOptions {
    /// Options for a one-shot listener.
    #[must_use]
    pub fn once() -> Self {
        Self { once: true }
    }
}

/// Listener callback. Receives the element the listener is attached to.
pub type Callback = Rc<dyn Fn(&Element, &mut Event)>;
