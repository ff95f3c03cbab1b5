//! Style transformer: theme rules and a stylesheet load barrier.
//!
//! Injects the static rule set into `head`, then hides the page until every
//! stylesheet served by the docs backend has fired `load`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::LazyLock;

use rw_dom::{
    AdjacentPosition, Element, Event, EventType, ListenerId, ListenerOptions, Selector, ShadowDom,
};
use rw_storage::TechDocsStorage;

use crate::effect::{Cleanup, Effect};
use crate::error::TransformError;
use crate::rules::css_rules;

static STYLESHEETS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"head > link[rel="stylesheet"]"#).expect("invalid stylesheet selector")
});

/// Injects CSS rules and waits for backend stylesheets.
pub struct StyleTransformer<S> {
    storage: Rc<S>,
    rules: String,
    effect: Effect<Option<ShadowDom>>,
}

impl<S: TechDocsStorage> StyleTransformer<S> {
    /// Create a transformer injecting the built-in rules.
    #[must_use]
    pub fn new(storage: Rc<S>) -> Self {
        Self::with_extra_rules(storage, &[])
    }

    /// Create a transformer injecting the built-in rules followed by `extra`.
    #[must_use]
    pub fn with_extra_rules(storage: Rc<S>, extra: &[String]) -> Self {
        Self {
            storage,
            rules: css_rules(extra),
            effect: Effect::new(),
        }
    }

    /// CSS injected on each pass.
    #[must_use]
    pub fn rules(&self) -> &str {
        &self.rules
    }

    /// Run a pass if the document changed.
    ///
    /// Load listeners still pending from the previous pass are removed first.
    /// Returns whether a pass ran.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Storage`] if the API origin lookup fails.
    pub async fn render(&mut self, dom: Option<&ShadowDom>) -> Result<bool, TransformError> {
        let deps = dom.cloned();
        if !self.effect.begin(&deps, false) {
            return Ok(false);
        }

        let mut cleanup = Cleanup::new();
        let result = match dom {
            Some(dom) => self.apply(dom, &mut cleanup).await,
            None => Ok(()),
        };
        self.effect.finish(cleanup);
        result.map(|()| true)
    }

    async fn apply(&self, dom: &ShadowDom, cleanup: &mut Cleanup) -> Result<(), TransformError> {
        let Some(head) = dom.head() else {
            tracing::warn!("Document has no head, skipping styles");
            return Ok(());
        };
        let style = format!("<style>{}</style>", self.rules);
        head.insert_adjacent_html(AdjacentPosition::BeforeEnd, &style);

        let links = dom.select(&STYLESHEETS);
        if links.is_empty() {
            return Ok(());
        }

        let api_origin = self.storage.api_origin().await?;
        let stylesheets: Vec<Element> = links
            .into_iter()
            .filter(|link| {
                link.attribute("href")
                    .is_some_and(|href| href.starts_with(&api_origin))
            })
            .collect();
        if stylesheets.is_empty() {
            return Ok(());
        }

        dom.root().set_style_property("opacity", "0");
        tracing::debug!(pending = stylesheets.len(), "Hiding content until stylesheets load");

        let pending = Rc::new(Cell::new(stylesheets.len()));
        let listeners: Rc<RefCell<Vec<ListenerId>>> = Rc::new(RefCell::new(Vec::new()));

        for link in &stylesheets {
            let pending = Rc::clone(&pending);
            let registered = Rc::clone(&listeners);
            let on_load = move |link: &Element, _: &mut Event| {
                let remaining = pending.get().saturating_sub(1);
                pending.set(remaining);
                if remaining > 0 {
                    return;
                }
                let dom = link.owner();
                for id in registered.borrow_mut().drain(..) {
                    dom.remove_event_listener(id);
                }
                dom.root().remove_style_property("opacity");
                tracing::debug!("Stylesheets loaded, content visible");
            };
            let id = link.add_event_listener(EventType::Load, ListenerOptions::once(), on_load);
            listeners.borrow_mut().push(id);
        }

        let owner = dom.clone();
        cleanup.push(move || {
            for id in listeners.borrow_mut().drain(..) {
                owner.remove_event_listener(id);
            }
        });
        Ok(())
    }

    /// Remove pending load listeners and forget the last pass.
    pub fn teardown(&mut self) {
        self.effect.teardown();
    }
}

impl<S> std::fmt::Debug for StyleTransformer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleTransformer")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
