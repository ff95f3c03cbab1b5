//! Pre-compiled CSS selectors.

use std::fmt;

use kuchikikiki::{NodeRef, Selectors};

use crate::error::DomError;

/// A compiled selector list, reusable across documents.
///
/// Matching is done by the `selectors` engine behind kuchikikiki, so the full
/// CSS level 3 grammar is available (`head > link[rel="stylesheet"]`,
/// `[title="Edit this page"]`, `article>h1`, ...).
pub struct Selector {
    source: String,
    compiled: Selectors,
}

impl Selector {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Selector`] when the selector cannot be parsed.
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let compiled =
            Selectors::compile(source).map_err(|()| DomError::Selector(source.to_owned()))?;
        Ok(Self {
            source: source.to_owned(),
            compiled,
        })
    }

    /// Selector source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` is an element matching this selector.
    pub(crate) fn matches(&self, node: &NodeRef) -> bool {
        node.clone()
            .into_element_ref()
            .is_some_and(|element| self.compiled.matches(&element))
    }

    /// Matching descendants of `scope` in document order, `scope` excluded.
    pub(crate) fn select(&self, scope: &NodeRef) -> Vec<NodeRef> {
        scope
            .descendants()
            .filter(|node| self.matches(node))
            .collect()
    }

    /// First matching descendant of `scope` in document order.
    pub(crate) fn select_first(&self, scope: &NodeRef) -> Option<NodeRef> {
        scope.descendants().find(|node| self.matches(node))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}
