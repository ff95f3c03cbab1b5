//! Isolated document subtree for RW page post-processing.
//!
//! A rendered documentation page is loaded into a [`ShadowDom`]: a
//! single-threaded document with the parts of the browser DOM that page
//! transformers rely on. Trees are built by html5ever through kuchikikiki, so
//! pages parse the way a browser parses them.
//!
//! - **Parsing and serialization** of HTML documents and fragments
//! - **Selectors** ([`Selector`]) compiled once and matched by the
//!   `selectors` engine
//! - **Events** with per-element listeners, one-shot registrations and
//!   `prevent_default`
//! - **Inline styles** through [`Element::set_style_property`]
//!
//! # Example
//!
//! ```
//! use rw_dom::{EventType, ListenerOptions, ShadowDom};
//!
//! let dom = ShadowDom::parse(r#"<a href="/docs">Docs</a>"#);
//! let link = dom.query_selector("a")?.expect("link");
//! link.add_event_listener(EventType::Click, ListenerOptions::default(), |_, event| {
//!     event.prevent_default();
//! });
//! assert!(link.click().default_prevented());
//! # Ok::<(), rw_dom::DomError>(())
//! ```

mod dom;
mod error;
mod event;
mod listeners;
mod selector;
mod style;

pub use dom::{AdjacentPosition, Element, ShadowDom};
pub use error::DomError;
pub use event::{Callback, Event, EventType, ListenerId, ListenerOptions, Modifiers};
pub use selector::Selector;
