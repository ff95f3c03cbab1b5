//! Anchor transformer: in-app navigation for internal links.
//!
//! Every `a` element gets a click listener. Clicks on links to the current
//! origin are turned into in-app navigation (or a new tab with ctrl/meta);
//! external links open in a new browsing context.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use rw_dom::{Element, Event, EventType, ListenerOptions, ShadowDom};
use url::Url;

use crate::effect::{Cleanup, Effect};
use crate::error::TransformError;
use crate::feedback::render_feedback_link;
use crate::reader::{Navigator, ReaderState, Window};
use crate::scm::ScmIntegrations;

static EXTERNAL_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("invalid external link regex"));

/// Browsing context name for new tabs.
const NEW_TAB: &str = "_blank";

/// Collaborators shared by every pass.
struct AnchorContext {
    window: Rc<dyn Window>,
    navigator: Rc<dyn Navigator>,
    integrations: Rc<dyn ScmIntegrations>,
    feedback_enabled: bool,
}

impl AnchorContext {
    fn pass(&self, dom: &ShadowDom, cleanup: &mut Cleanup) -> Result<(), TransformError> {
        // Rendered first so the sweep below also covers the feedback anchor.
        if self.feedback_enabled
            && let Some(portal) =
                render_feedback_link(dom, self.window.as_ref(), self.integrations.as_ref())?
        {
            cleanup.push(move || portal.unmount());
        }

        let anchors = dom.elements_by_tag_name("a");
        for anchor in &anchors {
            let window = Rc::clone(&self.window);
            let navigator = Rc::clone(&self.navigator);
            let id = anchor.add_event_listener(
                EventType::Click,
                ListenerOptions::default(),
                move |anchor, event| on_click(window.as_ref(), navigator.as_ref(), anchor, event),
            );
            let owner = dom.clone();
            cleanup.push(move || {
                owner.remove_event_listener(id);
            });

            if anchor
                .attribute("href")
                .is_some_and(|href| EXTERNAL_LINK_RE.is_match(&href))
            {
                anchor.set_attribute("target", NEW_TAB);
            }
        }

        tracing::debug!(anchors = anchors.len(), "Attached anchor click handlers");
        Ok(())
    }
}

/// Route a click on an internal link through the navigator.
fn on_click(window: &dyn Window, navigator: &dyn Navigator, anchor: &Element, event: &mut Event) {
    let Some(href) = anchor.attribute("href").filter(|href| !href.is_empty()) else {
        return;
    };
    if !href.starts_with(&window.origin()) || anchor.has_attribute("download") {
        return;
    }

    let url = match Url::parse(&href) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(href = %href, error = %e, "Ignoring click on unparsable link");
            return;
        }
    };

    event.prevent_default();

    let mut target = url.path().to_owned();
    if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
        target.push('#');
        target.push_str(fragment);
    }

    let modifiers = event.modifiers();
    if modifiers.ctrl || modifiers.meta {
        window.open(&target, NEW_TAB);
    } else {
        navigator.navigate(&target);
    }
}

/// Rewires anchors of the rendered page.
///
/// A pass runs when the document or the reader state changes. The previous
/// pass's listeners and feedback link are removed before a new pass starts.
pub struct AnchorTransformer {
    context: AnchorContext,
    effect: Effect<(Option<ShadowDom>, ReaderState)>,
}

impl AnchorTransformer {
    /// Create a transformer with the feedback link enabled.
    #[must_use]
    pub fn new(
        window: Rc<dyn Window>,
        navigator: Rc<dyn Navigator>,
        integrations: Rc<dyn ScmIntegrations>,
    ) -> Self {
        Self {
            context: AnchorContext {
                window,
                navigator,
                integrations,
                feedback_enabled: true,
            },
            effect: Effect::new(),
        }
    }

    /// Enable or disable the feedback link.
    #[must_use]
    pub fn with_feedback(mut self, enabled: bool) -> Self {
        self.context.feedback_enabled = enabled;
        self
    }

    /// Run a pass if the document or reader state changed.
    ///
    /// Returns whether a pass ran.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Dom`] if the feedback link cannot be mounted.
    pub fn render(
        &mut self,
        dom: Option<&ShadowDom>,
        reader: &ReaderState,
    ) -> Result<bool, TransformError> {
        self.update(dom, reader, false)
    }

    /// Run a pass even if nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Dom`] if the feedback link cannot be mounted.
    pub fn force_render(
        &mut self,
        dom: Option<&ShadowDom>,
        reader: &ReaderState,
    ) -> Result<bool, TransformError> {
        self.update(dom, reader, true)
    }

    fn update(
        &mut self,
        dom: Option<&ShadowDom>,
        reader: &ReaderState,
        force: bool,
    ) -> Result<bool, TransformError> {
        let deps = (dom.cloned(), reader.clone());
        let context = &self.context;
        self.effect.run(&deps, force, |(dom, _), cleanup| match dom {
            Some(dom) => context.pass(dom, cleanup),
            None => Ok(()),
        })
    }

    /// Remove all listeners and the feedback link.
    pub fn teardown(&mut self) {
        self.effect.teardown();
    }
}

impl std::fmt::Debug for AnchorTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorTransformer")
            .field("feedback_enabled", &self.context.feedback_enabled)
            .field("effect", &self.effect)
            .finish_non_exhaustive()
    }
}
