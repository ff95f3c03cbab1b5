//! Listener registry of one document.

use std::fmt;
use std::rc::Rc;

use kuchikikiki::NodeRef;

use crate::event::{Callback, EventType, ListenerId};

struct Registration {
    id: ListenerId,
    node: NodeRef,
    event_type: EventType,
    once: bool,
    callback: Callback,
}

/// Listeners keyed by element node, in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl Listeners {
    pub(crate) fn add(
        &mut self,
        node: NodeRef,
        event_type: EventType,
        once: bool,
        callback: Callback,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            node,
            event_type,
            once,
            callback,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|reg| reg.id != id);
        self.registrations.len() != before
    }

    /// Callbacks to run for `event_type` on `node`. One-shot registrations are
    /// removed before they are returned.
    pub(crate) fn take_callbacks(
        &mut self,
        node: &NodeRef,
        event_type: &EventType,
    ) -> Vec<Callback> {
        let callbacks = self
            .registrations
            .iter()
            .filter(|reg| reg.node == *node && reg.event_type == *event_type)
            .map(|reg| Rc::clone(&reg.callback))
            .collect();
        self.registrations
            .retain(|reg| !(reg.once && reg.node == *node && reg.event_type == *event_type));
        callbacks
    }

    pub(crate) fn count(&self, node: Option<&NodeRef>, event_type: Option<&EventType>) -> usize {
        self.registrations
            .iter()
            .filter(|reg| node.is_none_or(|node| reg.node == *node))
            .filter(|reg| event_type.is_none_or(|event_type| reg.event_type == *event_type))
            .count()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("registered", &self.registrations.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
