//! Content transformers for MkDocs pages rendered in an isolated document.
//!
//! A documentation page is mounted into a [`rw_dom::ShadowDom`] and
//! post-processed by three transformers:
//!
//! - [`StyleTransformer`] injects theme rules and hides the page until
//!   backend stylesheets have loaded
//! - [`BaseUrlTransformer`] rebases `src`/`href` values through
//!   [`rw_storage::TechDocsStorage`], gating the page until done
//! - [`AnchorTransformer`] routes internal links through the host's
//!   [`Navigator`], opens external links in a new tab and adds a
//!   "leave feedback" link next to "Edit this page"
//!
//! [`ContentTransformers`] composes them in that order.
//!
//! # Example
//!
//! ```ignore
//! use rw_techdocs::{ContentTransformers, ReaderState};
//!
//! let mut transformers = ContentTransformers::from_config(&config, window, navigator);
//! let reader = ReaderState::new("component:default/backstage".parse()?, "guide/");
//! if transformers.render(Some(&dom), &reader).await? {
//!     show(&dom);
//! }
//! ```

mod anchor;
mod base_url;
mod effect;
mod error;
mod feedback;
mod gate;
mod git_url;
mod portal;
mod reader;
pub mod rules;
mod scm;
mod style;
mod transformers;

pub use anchor::AnchorTransformer;
pub use base_url::{BaseUrlTransformer, normalize_url};
pub use effect::{Cleanup, Effect};
pub use error::TransformError;
pub use feedback::{FEEDBACK_LINK_ID, feedback_href, render_feedback_link};
pub use gate::{Gate, GateHandle};
pub use git_url::{GitRepository, parse_repository, replace_github_url_type};
pub use portal::Portal;
pub use reader::{Navigator, ReaderState, Window};
pub use scm::{ScmIntegration, ScmIntegrationKind, ScmIntegrationRegistry, ScmIntegrations};
pub use style::StyleTransformer;
pub use transformers::ContentTransformers;
