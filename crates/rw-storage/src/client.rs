//! Storage client for a documentation backend reachable over HTTP.
//!
//! Provides [`TechDocsStorageClient`], which resolves page-relative asset URLs
//! against the backend's static docs route:
//!
//! ```text
//! {api_origin}/static/docs/{namespace}/{kind}/{name}/{path}/
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::entity::EntityName;
use crate::storage::{StorageError, TechDocsStorage};

/// Characters escaped by `encodeURIComponent`.
///
/// Used for entity path segments and for query values built by consumers.
pub const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` the way `encodeURIComponent` does.
#[must_use]
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Storage client with a fixed API origin.
#[derive(Debug, Clone)]
pub struct TechDocsStorageClient {
    api_origin: String,
}

impl TechDocsStorageClient {
    /// Create a client for `api_origin` (trailing slashes are ignored).
    #[must_use]
    pub fn new(api_origin: impl Into<String>) -> Self {
        let mut api_origin = api_origin.into();
        while api_origin.ends_with('/') {
            api_origin.pop();
        }
        Self { api_origin }
    }

    /// Static docs root for a page, always ending with `/`.
    #[must_use]
    pub fn docs_root(&self, entity: &EntityName, path: &str) -> String {
        let mut root = format!(
            "{}/static/docs/{}/{}/{}/{}",
            self.api_origin,
            utf8_percent_encode(&entity.namespace, URI_COMPONENT),
            utf8_percent_encode(&entity.kind, URI_COMPONENT),
            utf8_percent_encode(&entity.name, URI_COMPONENT),
            path.trim_start_matches('/'),
        );
        if !root.ends_with('/') {
            root.push('/');
        }
        root
    }
}

impl TechDocsStorage for TechDocsStorageClient {
    async fn api_origin(&self) -> Result<String, StorageError> {
        Ok(self.api_origin.clone())
    }

    async fn base_url(
        &self,
        old_base_url: &str,
        entity: &EntityName,
        path: &str,
    ) -> Result<String, StorageError> {
        let root = self.docs_root(entity, path);
        let base = Url::parse(&root)
            .map_err(|e| StorageError::invalid_url(&root, e).with_backend("Client"))?;
        let resolved = base
            .join(old_base_url)
            .map_err(|e| StorageError::invalid_url(old_base_url, e).with_backend("Client"))?;

        tracing::trace!(old = old_base_url, new = %resolved, "Resolved base URL");
        Ok(resolved.into())
    }
}
