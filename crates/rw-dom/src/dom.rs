//! Shared handles to a document and its elements.
//!
//! [`ShadowDom`] and [`Element`] are cheap reference-counted handles, in the
//! spirit of browser DOM wrappers: cloning a handle never copies the tree, and
//! every mutation is visible through all handles. The tree itself is a
//! kuchikikiki node tree built by html5ever. No borrow is held while listener
//! callbacks run, so callbacks may freely read and mutate the document.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use tendril::TendrilSink;

use crate::error::DomError;
use crate::event::{Event, EventType, ListenerId, ListenerOptions, Modifiers};
use crate::listeners::Listeners;
use crate::selector::Selector;
use crate::style::{parse_declarations, serialize_declarations};

struct Document {
    node: NodeRef,
    root: NodeRef,
    listeners: RefCell<Listeners>,
}

/// Handle to one isolated document.
///
/// Equality is identity: two handles are equal when they refer to the same
/// tree, regardless of content.
#[derive(Clone)]
pub struct ShadowDom {
    document: Rc<Document>,
}

impl ShadowDom {
    /// Parse a document or fragment with the HTML5 tree builder.
    ///
    /// The result always has an `html` root with `head` and `body` children.
    /// `script` and `style` contents are kept as raw text.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let node = kuchikikiki::parse_html().one(html);
        // html5ever always inserts the html element
        let root = node
            .children()
            .find(is_element)
            .unwrap_or_else(|| node.clone());
        Self {
            document: Rc::new(Document {
                node,
                root,
                listeners: RefCell::default(),
            }),
        }
    }

    fn element(&self, node: NodeRef) -> Element {
        Element {
            dom: self.clone(),
            node,
        }
    }

    /// The `html` element.
    #[must_use]
    pub fn root(&self) -> Element {
        self.element(self.document.root.clone())
    }

    /// The `head` element.
    #[must_use]
    pub fn head(&self) -> Option<Element> {
        self.root_child("head")
    }

    /// The `body` element.
    #[must_use]
    pub fn body(&self) -> Option<Element> {
        self.root_child("body")
    }

    fn root_child(&self, name: &str) -> Option<Element> {
        let node = self
            .document
            .root
            .children()
            .find(|child| local_name(child).as_deref() == Some(name))?;
        Some(self.element(node))
    }

    /// Create a detached HTML element.
    #[must_use]
    pub fn create_element(&self, tag: &str) -> Element {
        let node = match self.document.root.as_element() {
            Some(root) => {
                let mut name = root.name.clone();
                name.local = tag.to_ascii_lowercase().as_str().into();
                NodeRef::new_element(name, std::iter::empty::<(ExpandedName, Attribute)>())
            }
            None => NodeRef::new_document(),
        };
        self.element(node)
    }

    /// First element matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Selector`] for invalid selectors.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
        Ok(self.select_first(&Selector::parse(selector)?))
    }

    /// All elements matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Selector`] for invalid selectors.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
        Ok(self.select(&Selector::parse(selector)?))
    }

    /// First element matching a compiled selector.
    #[must_use]
    pub fn select_first(&self, selector: &Selector) -> Option<Element> {
        let found = selector.select_first(&self.document.node)?;
        Some(self.element(found))
    }

    /// All elements matching a compiled selector.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<Element> {
        selector
            .select(&self.document.node)
            .into_iter()
            .map(|node| self.element(node))
            .collect()
    }

    /// All elements with the given tag name (case-insensitive).
    #[must_use]
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<Element> {
        self.document
            .node
            .descendants()
            .filter(|node| local_name(node).is_some_and(|name| name.eq_ignore_ascii_case(tag)))
            .map(|node| self.element(node))
            .collect()
    }

    /// Remove a listener by id. Unknown ids are ignored.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.document.listeners.borrow_mut().remove(id)
    }

    /// Number of listeners registered anywhere in the document.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.document.listeners.borrow().count(None, None)
    }

    /// Serialize the `html` element.
    #[must_use]
    pub fn to_html(&self) -> String {
        serialize(&self.document.root)
    }

    /// Whether both handles refer to the same document.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.document, &other.document)
    }
}

impl PartialEq for ShadowDom {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ShadowDom {}

impl fmt::Debug for ShadowDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowDom")
            .field("ptr", &Rc::as_ptr(&self.document))
            .field("listeners", &self.document.listeners.borrow())
            .finish_non_exhaustive()
    }
}

fn is_element(node: &NodeRef) -> bool {
    node.as_element().is_some()
}

fn local_name(node: &NodeRef) -> Option<String> {
    node.as_element()
        .map(|element| AsRef::<str>::as_ref(&element.name.local).to_owned())
}

fn serialize(node: &NodeRef) -> String {
    let mut out = Vec::new();
    if let Err(e) = node.serialize(&mut out) {
        tracing::warn!(error = %e, "Failed to serialize node");
    }
    String::from_utf8(out).unwrap_or_default()
}

/// Where [`Element::insert_adjacent_element`] places content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacentPosition {
    /// Before the element, as a sibling.
    BeforeBegin,
    /// Inside the element, before its first child.
    AfterBegin,
    /// Inside the element, after its last child.
    BeforeEnd,
    /// After the element, as a sibling.
    AfterEnd,
}

/// Handle to one element of a [`ShadowDom`].
#[derive(Clone, PartialEq, Eq)]
pub struct Element {
    dom: ShadowDom,
    node: NodeRef,
}

impl Element {
    /// Document owning this element.
    #[must_use]
    pub fn owner(&self) -> &ShadowDom {
        &self.dom
    }

    /// Upper-case tag name, as the DOM reports it for HTML elements.
    #[must_use]
    pub fn tag_name(&self) -> String {
        self.local_name().to_ascii_uppercase()
    }

    /// Lower-case tag name.
    #[must_use]
    pub fn local_name(&self) -> String {
        local_name(&self.node).unwrap_or_default()
    }

    /// Attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        let element = self.node.as_element()?;
        let attributes = element.attributes.borrow();
        attributes.get(name.to_ascii_lowercase().as_str()).map(str::to_owned)
    }

    /// Whether the attribute is present (valueless attributes count).
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.node.as_element().is_some_and(|element| {
            element
                .attributes
                .borrow()
                .contains(name.to_ascii_lowercase().as_str())
        })
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attribute(&self, name: &str, value: &str) {
        if let Some(element) = self.node.as_element() {
            element
                .attributes
                .borrow_mut()
                .insert(name.to_ascii_lowercase().as_str(), value.to_owned());
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&self, name: &str) -> bool {
        self.node.as_element().is_some_and(|element| {
            element
                .attributes
                .borrow_mut()
                .remove(name.to_ascii_lowercase().as_str())
                .is_some()
        })
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.node.text_contents()
    }

    /// Text content of the first child node, element or text.
    #[must_use]
    pub fn first_child_text(&self) -> Option<String> {
        Some(self.node.first_child()?.text_contents())
    }

    /// Child elements.
    #[must_use]
    pub fn children(&self) -> Vec<Element> {
        self.node
            .children()
            .filter(is_element)
            .map(|node| self.dom.element(node))
            .collect()
    }

    /// Parent element.
    #[must_use]
    pub fn parent(&self) -> Option<Element> {
        let parent = self.node.parent().filter(is_element)?;
        Some(self.dom.element(parent))
    }

    /// Whether `other` is this element or one of its ancestors.
    fn is_inclusive_descendant_of(&self, other: &Element) -> bool {
        self.node.inclusive_ancestors().any(|node| node == other.node)
    }

    /// Append `child`, moving it if it is already attached.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Hierarchy`] when `child` is `self` or one of its
    /// ancestors.
    pub fn append_child(&self, child: &Element) -> Result<(), DomError> {
        if self.is_inclusive_descendant_of(child) {
            return Err(DomError::Hierarchy);
        }
        self.node.append(child.node.clone());
        Ok(())
    }

    /// Insert `element` relative to this one, moving it if already attached.
    ///
    /// Returns `Ok(false)` when a sibling position is requested and this
    /// element has no parent.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Hierarchy`] when the insertion would create a cycle.
    pub fn insert_adjacent_element(
        &self,
        position: AdjacentPosition,
        element: &Element,
    ) -> Result<bool, DomError> {
        if self.is_inclusive_descendant_of(element) {
            return Err(DomError::Hierarchy);
        }
        match position {
            AdjacentPosition::BeforeBegin | AdjacentPosition::AfterEnd
                if self.node.parent().is_none() =>
            {
                return Ok(false);
            }
            AdjacentPosition::BeforeBegin => self.node.insert_before(element.node.clone()),
            AdjacentPosition::AfterEnd => self.node.insert_after(element.node.clone()),
            AdjacentPosition::AfterBegin => self.node.prepend(element.node.clone()),
            AdjacentPosition::BeforeEnd => self.node.append(element.node.clone()),
        }
        Ok(true)
    }

    /// Parse `html` as a fragment and insert the resulting nodes relative to
    /// this element.
    ///
    /// Sibling positions parse in the context of the parent element, inner
    /// positions in the context of this element. Returns `false` when a
    /// sibling position is requested and this element has no parent.
    pub fn insert_adjacent_html(&self, position: AdjacentPosition, html: &str) -> bool {
        let context = match position {
            AdjacentPosition::BeforeBegin | AdjacentPosition::AfterEnd => self.node.parent(),
            AdjacentPosition::AfterBegin | AdjacentPosition::BeforeEnd => Some(self.node.clone()),
        };
        let Some(context) = context.filter(is_element) else {
            return false;
        };
        let nodes = parse_fragment(&context, html);

        match position {
            AdjacentPosition::BeforeBegin => {
                for node in nodes {
                    self.node.insert_before(node);
                }
            }
            AdjacentPosition::AfterEnd => {
                for node in nodes.into_iter().rev() {
                    self.node.insert_after(node);
                }
            }
            AdjacentPosition::AfterBegin => {
                for node in nodes.into_iter().rev() {
                    self.node.prepend(node);
                }
            }
            AdjacentPosition::BeforeEnd => {
                for node in nodes {
                    self.node.append(node);
                }
            }
        }
        true
    }

    /// Replace all children with the parsed `html`.
    pub fn set_inner_html(&self, html: &str) {
        self.clear_children();
        self.insert_adjacent_html(AdjacentPosition::BeforeEnd, html);
    }

    /// Serialized children.
    #[must_use]
    pub fn inner_html(&self) -> String {
        self.node.children().map(|child| serialize(&child)).collect()
    }

    /// Serialized element including itself.
    #[must_use]
    pub fn outer_html(&self) -> String {
        serialize(&self.node)
    }

    /// Detach all children.
    pub fn clear_children(&self) {
        let children: Vec<NodeRef> = self.node.children().collect();
        for child in children {
            child.detach();
        }
    }

    /// Detach this element from its parent.
    pub fn remove(&self) {
        self.node.detach();
    }

    /// Whether the element is attached to its document.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.node
            .inclusive_ancestors()
            .last()
            .is_some_and(|top| top == self.dom.document.node)
    }

    /// Inline style property value.
    #[must_use]
    pub fn style_property(&self, name: &str) -> Option<String> {
        let style = self.attribute("style")?;
        parse_declarations(&style)
            .into_iter()
            .find(|(prop, _)| prop.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Set an inline style property.
    pub fn set_style_property(&self, name: &str, value: &str) {
        let mut decls = parse_declarations(&self.attribute("style").unwrap_or_default());
        let name = name.to_ascii_lowercase();
        match decls.iter_mut().find(|(prop, _)| *prop == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => decls.push((name, value.to_owned())),
        }
        self.set_attribute("style", &serialize_declarations(&decls));
    }

    /// Remove an inline style property and return its old value.
    ///
    /// The `style` attribute is removed once no declarations remain.
    pub fn remove_style_property(&self, name: &str) -> Option<String> {
        let mut decls = parse_declarations(&self.attribute("style")?);
        let index = decls
            .iter()
            .position(|(prop, _)| prop.eq_ignore_ascii_case(name))?;
        let (_, old) = decls.remove(index);
        if decls.is_empty() {
            self.remove_attribute("style");
        } else {
            self.set_attribute("style", &serialize_declarations(&decls));
        }
        Some(old)
    }

    /// First descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Selector`] for invalid selectors.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(selector
            .select_first(&self.node)
            .map(|node| self.dom.element(node)))
    }

    /// All descendants matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Selector`] for invalid selectors.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(selector
            .select(&self.node)
            .into_iter()
            .map(|node| self.dom.element(node))
            .collect())
    }

    /// Register a listener. The callback receives this element and the event.
    pub fn add_event_listener<F>(
        &self,
        event_type: EventType,
        options: ListenerOptions,
        callback: F,
    ) -> ListenerId
    where
        F: Fn(&Element, &mut Event) + 'static,
    {
        self.dom.document.listeners.borrow_mut().add(
            self.node.clone(),
            event_type,
            options.once,
            Rc::new(callback),
        )
    }

    /// Remove a listener by id.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.dom.remove_event_listener(id)
    }

    /// Number of listeners of `event_type` on this element.
    #[must_use]
    pub fn listener_count(&self, event_type: &EventType) -> usize {
        self.dom
            .document
            .listeners
            .borrow()
            .count(Some(&self.node), Some(event_type))
    }

    /// Deliver `event` to this element's listeners and return it afterwards.
    pub fn dispatch_event(&self, mut event: Event) -> Event {
        let callbacks = self
            .dom
            .document
            .listeners
            .borrow_mut()
            .take_callbacks(&self.node, event.event_type());
        tracing::trace!(
            element = %self.local_name(),
            event = %event.event_type(),
            listeners = callbacks.len(),
            "Dispatching event"
        );
        for callback in callbacks {
            callback(self, &mut event);
        }
        event
    }

    /// Simulate a plain click.
    pub fn click(&self) -> Event {
        self.dispatch_event(Event::click())
    }

    /// Simulate a click with modifier keys held.
    pub fn click_with(&self, modifiers: Modifiers) -> Event {
        self.dispatch_event(Event::click().with_modifiers(modifiers))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "Element(<{}> #{id})", self.local_name()),
            None => write!(f, "Element(<{}>)", self.local_name()),
        }
    }
}

/// Parse `html` in the context of `context` and detach the resulting nodes.
fn parse_fragment(context: &NodeRef, html: &str) -> Vec<NodeRef> {
    let Some(element) = context.as_element() else {
        return Vec::new();
    };
    // The fragment parser returns a document wrapping an `html` element that
    // holds the parsed nodes.
    let document = kuchikikiki::parse_fragment(element.name.clone(), Vec::new()).one(html);
    let holder = document
        .children()
        .find(is_element)
        .unwrap_or(document);
    let nodes: Vec<NodeRef> = holder.children().collect();
    for node in &nodes {
        node.detach();
    }
    nodes
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    const MATERIAL_HEAD: &str = concat!(
        r#"<head><meta charset="utf-8"><script>"#,
        r#"__md_scope=new URL(".",location),"#,
        "__md_hash=e=>[...e].reduce((e,_)=>(e<<5)-e+_.charCodeAt(0),0),",
        r#"__md_get=(e,_=localStorage,t=__md_scope)=>JSON.parse(_.getItem(t.pathname+"."+e))"#,
        r#"</script><link rel="stylesheet" href="http://localhost:7007/api/techdocs/static/"#,
        r#"docs/default/component/backstage/assets/stylesheets/main.css">"#,
        r#"<style>:root{--md-text-font:"Roboto"}a > b{color:red}</style></head>"#,
    );

    #[test]
    fn test_parse_fragment_is_normalized() {
        let dom = ShadowDom::parse(r#"<a href="/docs">Docs</a>"#);

        assert_eq!(dom.root().local_name(), "html");
        assert!(dom.head().is_some());
        assert_eq!(
            dom.to_html(),
            r#"<html><head></head><body><a href="/docs">Docs</a></body></html>"#
        );
    }

    #[test]
    fn test_parse_body_only() {
        let dom = ShadowDom::parse("<body><p>x</p></body>");

        assert_eq!(dom.to_html(), "<html><head></head><body><p>x</p></body></html>");
    }

    #[test]
    fn test_full_document() {
        let dom = ShadowDom::parse(
            r"<!DOCTYPE html><html><head><title>T</title></head><body><h1>H</h1></body></html>",
        );

        assert_eq!(dom.head().unwrap().text_content(), "T");
        assert_eq!(dom.body().unwrap().text_content(), "H");
    }

    #[test]
    fn test_inline_script_is_raw_text() {
        let dom = ShadowDom::parse(&format!("<html>{MATERIAL_HEAD}<body></body></html>"));
        let head = dom.head().unwrap();
        let script = dom.query_selector("head > script").unwrap().unwrap();

        assert!(script.text_content().contains("(e<<5)-e+_.charCodeAt(0),0)"));
        assert!(script.children().is_empty());
        let links = dom.query_selector_all(r#"head > link[rel="stylesheet"]"#).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].parent(), Some(head));
        assert_eq!(
            dom.query_selector("head > style").unwrap().unwrap().text_content(),
            r#":root{--md-text-font:"Roboto"}a > b{color:red}"#
        );
    }

    #[test]
    fn test_script_round_trips_unchanged() {
        let dom = ShadowDom::parse(r#"<script>if (a < b) { go("&amp;copy"); }</script>"#);

        assert_eq!(
            dom.head().unwrap().inner_html(),
            r#"<script>if (a < b) { go("&amp;copy"); }</script>"#
        );
    }

    #[test]
    fn test_entities_are_decoded_in_text_and_attributes() {
        let dom = ShadowDom::parse(r#"<p title="a &amp; b">&copy; 2024 &lt;docs&gt;</p>"#);
        let p = dom.query_selector("p").unwrap().unwrap();

        assert_eq!(p.attribute("title").as_deref(), Some("a & b"));
        assert_eq!(p.text_content(), "\u{a9} 2024 <docs>");
        assert_eq!(p.inner_html(), "\u{a9} 2024 &lt;docs&gt;");
    }

    #[test]
    fn test_identity_equality() {
        let a = ShadowDom::parse("<p></p>");
        let b = ShadowDom::parse("<p></p>");

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_tag_name_is_uppercase() {
        let dom = ShadowDom::parse("<IMG src=\"a.png\">");
        let img = dom.query_selector("img").unwrap().unwrap();

        assert_eq!(img.tag_name(), "IMG");
        assert_eq!(img.local_name(), "img");
    }

    #[test]
    fn test_set_and_remove_attribute() {
        let dom = ShadowDom::parse("<a>x</a>");
        let a = dom.query_selector("a").unwrap().unwrap();

        a.set_attribute("target", "_blank");
        assert_eq!(a.attribute("target").as_deref(), Some("_blank"));
        assert!(a.remove_attribute("target"));
        assert!(!a.has_attribute("target"));
    }

    #[test]
    fn test_valueless_attribute_is_present() {
        let dom = ShadowDom::parse("<a href=file.pdf download>x</a>");
        let a = dom.query_selector("a").unwrap().unwrap();

        assert!(a.has_attribute("download"));
        assert_eq!(a.attribute("href").as_deref(), Some("file.pdf"));
    }

    #[test]
    fn test_insert_before_moves_existing_node() {
        let dom = ShadowDom::parse(r#"<div id="a"></div><p id="b"></p><p id="c"></p>"#);
        let a = dom.query_selector("#a").unwrap().unwrap();
        let c = dom.query_selector("#c").unwrap().unwrap();

        assert!(c.insert_adjacent_element(AdjacentPosition::BeforeBegin, &a).unwrap());
        assert_eq!(
            dom.body().unwrap().inner_html(),
            r#"<p id="b"></p><div id="a"></div><p id="c"></p>"#
        );
    }

    #[test]
    fn test_insert_before_detached_reference() {
        let dom = ShadowDom::parse("");
        let detached = dom.create_element("div");
        let other = dom.create_element("span");

        assert!(!detached.insert_adjacent_element(AdjacentPosition::BeforeBegin, &other).unwrap());
    }

    #[test]
    fn test_insert_into_own_subtree_is_rejected() {
        let dom = ShadowDom::parse(r#"<div id="outer"><p id="inner"></p></div>"#);
        let outer = dom.query_selector("#outer").unwrap().unwrap();
        let inner = dom.query_selector("#inner").unwrap().unwrap();

        assert!(matches!(inner.append_child(&outer), Err(DomError::Hierarchy)));
        assert!(matches!(
            inner.insert_adjacent_element(AdjacentPosition::AfterEnd, &outer),
            Err(DomError::Hierarchy)
        ));
    }

    #[test]
    fn test_created_element_serializes() {
        let dom = ShadowDom::parse("");
        let div = dom.create_element("DIV");
        div.set_attribute("id", "mount");
        dom.body().unwrap().append_child(&div).unwrap();

        assert_eq!(div.tag_name(), "DIV");
        assert!(div.is_connected());
        assert_eq!(dom.body().unwrap().inner_html(), r#"<div id="mount"></div>"#);
    }

    #[test]
    fn test_insert_adjacent_html_into_head() {
        let dom = ShadowDom::parse("<head><title>T</title></head>");
        let head = dom.head().unwrap();

        assert!(head.insert_adjacent_html(
            AdjacentPosition::BeforeEnd,
            "<style>a > p { margin: 0; }</style>"
        ));
        assert_eq!(
            head.inner_html(),
            "<title>T</title><style>a > p { margin: 0; }</style>"
        );
    }

    #[test]
    fn test_insert_adjacent_html_keeps_order() {
        let dom = ShadowDom::parse(r#"<p id="a"></p>"#);
        let a = dom.query_selector("#a").unwrap().unwrap();
        a.insert_adjacent_html(AdjacentPosition::AfterEnd, "<i>1</i><i>2</i>");
        a.insert_adjacent_html(AdjacentPosition::AfterBegin, "<b>1</b><b>2</b>");

        assert_eq!(
            dom.body().unwrap().inner_html(),
            r#"<p id="a"><b>1</b><b>2</b></p><i>1</i><i>2</i>"#
        );
    }

    #[test]
    fn test_insert_adjacent_html_beside_detached_element() {
        let dom = ShadowDom::parse("");
        let detached = dom.create_element("div");

        assert!(!detached.insert_adjacent_html(AdjacentPosition::BeforeBegin, "<i></i>"));
    }

    #[test]
    fn test_set_inner_html_replaces_children() {
        let dom = ShadowDom::parse(r#"<div id="mount"><b>old</b></div>"#);
        let mount = dom.query_selector("#mount").unwrap().unwrap();
        mount.set_inner_html("<i>new</i>");

        assert_eq!(mount.inner_html(), "<i>new</i>");
    }

    #[test]
    fn test_style_properties() {
        let dom = ShadowDom::parse("");
        let root = dom.root();

        root.set_style_property("opacity", "0");
        assert_eq!(root.style_property("opacity").as_deref(), Some("0"));
        assert_eq!(root.attribute("style").as_deref(), Some("opacity: 0;"));

        assert_eq!(root.remove_style_property("opacity").as_deref(), Some("0"));
        assert!(!root.has_attribute("style"));
    }

    #[test]
    fn test_remove_style_property_keeps_others() {
        let dom = ShadowDom::parse(r#"<div style="color: red; opacity: 0"></div>"#);
        let div = dom.query_selector("div").unwrap().unwrap();
        div.remove_style_property("opacity");

        assert_eq!(div.attribute("style").as_deref(), Some("color: red;"));
    }

    #[test]
    fn test_first_child_text() {
        let dom = ShadowDom::parse("<article><h1>Title<a>¶</a></h1></article>");
        let h1 = dom.query_selector("article>h1").unwrap().unwrap();

        assert_eq!(h1.first_child_text().as_deref(), Some("Title"));
        assert_eq!(h1.text_content(), "Title¶");
    }

    #[test]
    fn test_click_listener_can_prevent_default() {
        let dom = ShadowDom::parse("<a href=\"/x\">x</a>");
        let a = dom.query_selector("a").unwrap().unwrap();
        a.add_event_listener(EventType::Click, ListenerOptions::default(), |_, event| {
            event.prevent_default();
        });

        assert!(a.click().default_prevented());
    }

    #[test]
    fn test_listener_may_mutate_document() {
        let dom = ShadowDom::parse("<a>x</a>");
        let a = dom.query_selector("a").unwrap().unwrap();
        a.add_event_listener(EventType::Click, ListenerOptions::default(), |target, _| {
            target.set_attribute("data-clicked", "yes");
            target.owner().root().set_style_property("opacity", "1");
        });
        a.click();

        assert_eq!(a.attribute("data-clicked").as_deref(), Some("yes"));
        assert_eq!(dom.root().style_property("opacity").as_deref(), Some("1"));
    }

    #[test]
    fn test_listeners_follow_the_element_not_the_handle() {
        let dom = ShadowDom::parse(r#"<a id="x">x</a>"#);
        let first = dom.query_selector("#x").unwrap().unwrap();
        first.add_event_listener(EventType::Click, ListenerOptions::default(), |_, event| {
            event.prevent_default();
        });

        let second = dom.query_selector("a").unwrap().unwrap();
        assert_eq!(first, second);
        assert!(second.click().default_prevented());
    }

    #[test]
    fn test_once_listener_fires_once() {
        let dom = ShadowDom::parse(r#"<link rel="stylesheet" href="a.css">"#);
        let link = dom.query_selector("link").unwrap().unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        link.add_event_listener(EventType::Load, ListenerOptions::once(), move |_, _| {
            counter.set(counter.get() + 1);
        });

        link.dispatch_event(Event::load());
        link.dispatch_event(Event::load());

        assert_eq!(hits.get(), 1);
        assert_eq!(link.listener_count(&EventType::Load), 0);
    }

    #[test]
    fn test_remove_event_listener() {
        let dom = ShadowDom::parse("<a>x</a>");
        let a = dom.query_selector("a").unwrap().unwrap();
        let id = a.add_event_listener(EventType::Click, ListenerOptions::default(), |_, event| {
            event.prevent_default();
        });

        assert!(a.remove_event_listener(id));
        assert!(!a.remove_event_listener(id));
        assert!(!a.click().default_prevented());
        assert_eq!(dom.listener_count(), 0);
    }

    #[test]
    fn test_is_connected() {
        let dom = ShadowDom::parse("<p>x</p>");
        let p = dom.query_selector("p").unwrap().unwrap();
        let detached = dom.create_element("div");

        assert!(p.is_connected());
        assert!(!detached.is_connected());
        p.remove();
        assert!(!p.is_connected());
    }

    #[test]
    fn test_elements_by_tag_name() {
        let dom = ShadowDom::parse("<a>1</a><div><A>2</A></div>");

        assert_eq!(dom.elements_by_tag_name("A").len(), 2);
    }
}
