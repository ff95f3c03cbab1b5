//! Base-URL transformer: rebase asset and link URLs onto the docs backend.
//!
//! MkDocs renders URLs relative to the page. Inside the viewer the page lives
//! under an app route, so `src`/`href` values are resolved through
//! [`TechDocsStorage::base_url`] before the children are shown.

use std::rc::Rc;
use std::sync::LazyLock;

use rw_dom::{Selector, ShadowDom};
use rw_storage::TechDocsStorage;
use url::Url;

use crate::effect::{Cleanup, Effect};
use crate::error::TransformError;
use crate::gate::{Gate, GateHandle};
use crate::reader::{ReaderState, Window};

/// URL-bearing attribute per element tag.
const URL_ATTRIBUTES: &[(&str, &str)] = &[
    ("IMG", "src"),
    ("SCRIPT", "src"),
    ("SOURCE", "src"),
    ("LINK", "href"),
    ("A", "href"),
];

static URL_ELEMENTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img, script, source, link, a").expect("invalid URL element selector")
});

fn url_attribute(tag_name: &str) -> Option<&'static str> {
    URL_ATTRIBUTES
        .iter()
        .find(|(tag, _)| *tag == tag_name)
        .map(|(_, attribute)| *attribute)
}

/// Make sure the URL path ends with `/` unless it names an `.html` page.
#[must_use]
pub fn normalize_url(mut url: Url) -> Url {
    let path = url.path();
    if !path.ends_with('/') && !path.ends_with(".html") {
        let path = format!("{path}/");
        url.set_path(&path);
    }
    url
}

/// Rewrites URL attributes and gates its children until done.
pub struct BaseUrlTransformer<S> {
    storage: Rc<S>,
    window: Rc<dyn Window>,
    gate: Gate,
    effect: Effect<(Option<ShadowDom>, ReaderState)>,
}

impl<S: TechDocsStorage> BaseUrlTransformer<S> {
    /// Create a transformer resolving through `storage`.
    #[must_use]
    pub fn new(storage: Rc<S>, window: Rc<dyn Window>) -> Self {
        Self {
            storage,
            window,
            gate: Gate::new(),
            effect: Effect::new(),
        }
    }

    /// Handle reporting whether the children may render.
    #[must_use]
    pub fn gate(&self) -> GateHandle {
        self.gate.handle()
    }

    /// Run a pass if the document or reader state changed.
    ///
    /// The gate is loading while the pass runs and ready afterwards, also when
    /// a lookup fails. Returns whether a pass ran.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Storage`] if a lookup fails (elements after
    /// the failing one keep their original values) and
    /// [`TransformError::Url`] if an anchor cannot be resolved.
    pub async fn render(
        &mut self,
        dom: Option<&ShadowDom>,
        reader: &ReaderState,
    ) -> Result<bool, TransformError> {
        let deps = (dom.cloned(), reader.clone());
        if !self.effect.begin(&deps, false) {
            return Ok(false);
        }

        self.gate.set_loading();
        let result = match dom {
            Some(dom) => self.rewrite(dom, reader).await,
            None => Ok(()),
        };
        self.effect.finish(Cleanup::new());
        self.gate.set_ready();

        if let Err(e) = &result {
            tracing::warn!(page = %reader, error = %e, "Base URL rewrite failed");
        }
        result.map(|()| true)
    }

    async fn rewrite(&self, dom: &ShadowDom, reader: &ReaderState) -> Result<(), TransformError> {
        let mut rewritten = 0_usize;

        for element in dom.select(&URL_ELEMENTS) {
            let tag_name = element.tag_name();
            let Some(attribute) = url_attribute(&tag_name) else {
                continue;
            };
            let Some(value) = element.attribute(attribute).filter(|v| !v.is_empty()) else {
                continue;
            };

            let base_url = self
                .storage
                .base_url(&value, &reader.entity, &reader.path)
                .await?;

            if tag_name == "A" && !element.has_attribute("download") {
                let base = normalize_url(self.window.location());
                let href = base.join(&value)?;
                element.set_attribute("href", href.as_str());
            } else {
                element.set_attribute(attribute, &base_url);
            }
            rewritten += 1;
        }

        tracing::debug!(page = %reader, rewritten, "Rewrote base URLs");
        Ok(())
    }

    /// Forget the last pass so the next render runs again.
    pub fn teardown(&mut self) {
        self.effect.teardown();
    }
}

impl<S> std::fmt::Debug for BaseUrlTransformer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseUrlTransformer")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
