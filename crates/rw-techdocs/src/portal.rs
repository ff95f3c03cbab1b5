//! Rendering into a container outside the transformer's own output.

use rw_dom::Element;

/// Content mounted into an external container element.
///
/// The container's children are replaced on mount and cleared on
/// [`Portal::unmount`]. The container itself stays in the document.
#[derive(Debug)]
pub struct Portal {
    container: Element,
}

impl Portal {
    /// Replace the children of `container` with `html`.
    #[must_use]
    pub fn mount(container: Element, html: &str) -> Self {
        container.set_inner_html(html);
        Self { container }
    }

    /// The container element.
    #[must_use]
    pub fn container(&self) -> &Element {
        &self.container
    }

    /// Remove the mounted content.
    pub fn unmount(self) {
        self.container.clear_children();
    }
}

#[cfg(test)]
mod tests {
    use rw_dom::ShadowDom;

    use super::*;

    #[test]
    fn test_portal_mount_and_unmount() {
        let dom = ShadowDom::parse(r#"<div id="slot"><span>old</span></div>"#);
        let slot = dom.query_selector("#slot").unwrap().unwrap();

        let portal = Portal::mount(slot.clone(), "<a href=\"/x\">new</a>");
        assert_eq!(slot.inner_html(), r#"<a href="/x">new</a>"#);
        assert_eq!(portal.container(), &slot);

        portal.unmount();
        assert_eq!(slot.inner_html(), "");
        assert!(slot.is_connected());
    }
}
