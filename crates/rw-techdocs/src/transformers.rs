//! Composition of the page transformers.

use std::rc::Rc;

use rw_config::Config;
use rw_dom::ShadowDom;
use rw_storage::{TechDocsStorage, TechDocsStorageClient};

use crate::anchor::AnchorTransformer;
use crate::base_url::BaseUrlTransformer;
use crate::error::TransformError;
use crate::gate::GateHandle;
use crate::reader::{Navigator, ReaderState, Window};
use crate::scm::{ScmIntegrationRegistry, ScmIntegrations};
use crate::style::StyleTransformer;

/// The transformers nested as style, base URL, anchor.
///
/// Each [`render`](Self::render) runs the style pass, then the base URL pass;
/// the anchor pass runs once the base URL gate is ready.
pub struct ContentTransformers<S> {
    style: StyleTransformer<S>,
    base_url: BaseUrlTransformer<S>,
    anchor: AnchorTransformer,
}

impl<S: TechDocsStorage> ContentTransformers<S> {
    /// Compose the transformers over shared collaborators.
    ///
    /// `config` supplies the feedback switch and extra style rules.
    #[must_use]
    pub fn new(
        storage: Rc<S>,
        window: Rc<dyn Window>,
        navigator: Rc<dyn Navigator>,
        integrations: Rc<dyn ScmIntegrations>,
        config: &Config,
    ) -> Self {
        Self {
            style: StyleTransformer::with_extra_rules(
                Rc::clone(&storage),
                &config.styles.extra_rules,
            ),
            base_url: BaseUrlTransformer::new(storage, Rc::clone(&window)),
            anchor: AnchorTransformer::new(window, navigator, integrations)
                .with_feedback(config.feedback.enabled),
        }
    }

    /// Gate of the base URL pass.
    #[must_use]
    pub fn gate(&self) -> GateHandle {
        self.base_url.gate()
    }

    /// Run all passes whose dependencies changed.
    ///
    /// Returns whether the children (the page content) are rendered.
    ///
    /// # Errors
    ///
    /// Returns the first error of the style or base URL pass after all passes
    /// ran, or the anchor pass error.
    pub async fn render(
        &mut self,
        dom: Option<&ShadowDom>,
        reader: &ReaderState,
    ) -> Result<bool, TransformError> {
        let styled = self.style.render(dom).await;
        let rebased = self.base_url.render(dom, reader).await;

        let ready = self.base_url.gate().is_ready();
        if ready {
            self.anchor.render(dom, reader)?;
        }

        styled?;
        rebased?;
        Ok(ready)
    }

    /// Remove everything the passes attached to the current document.
    pub fn teardown(&mut self) {
        self.anchor.teardown();
        self.base_url.teardown();
        self.style.teardown();
    }
}

impl ContentTransformers<TechDocsStorageClient> {
    /// Compose the transformers from configuration.
    ///
    /// Storage resolves against `storage.api_origin`; integrations come from
    /// the `[integrations]` section.
    #[must_use]
    pub fn from_config(
        config: &Config,
        window: Rc<dyn Window>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let storage = Rc::new(TechDocsStorageClient::new(config.storage.api_origin.as_str()));
        let integrations = Rc::new(ScmIntegrationRegistry::from_config(&config.integrations));
        Self::new(storage, window, navigator, integrations, config)
    }
}

impl<S> std::fmt::Debug for ContentTransformers<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTransformers")
            .field("style", &self.style)
            .field("base_url", &self.base_url)
            .field("anchor", &self.anchor)
            .finish()
    }
}
