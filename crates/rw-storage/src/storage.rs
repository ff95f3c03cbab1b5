//! Storage trait and error types.
//!
//! Provides the [`TechDocsStorage`] trait used by page transformers to resolve
//! asset URLs against the documentation backend, along with [`StorageError`]
//! for unified error handling across backends.
//!
//! # URL Convention
//!
//! `path` parameters are **page paths** inside an entity's documentation
//! site, not file paths:
//! - `""` - root (home page)
//! - `"guide/"` - page rendered from `guide/index.md`
//! - `"guide/setup/"` - nested page

use std::future::Future;

use crate::entity::EntityName;

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// URL could not be parsed or joined.
    InvalidUrl,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// URL context (if applicable).
    pub url: Option<String>,
    /// Backend identifier (e.g., "Client", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            url: None,
            backend: None,
            source: None,
        }
    }

    /// Attach URL context.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create an invalid URL error from a parse failure.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, err: url::ParseError) -> Self {
        Self::new(StorageErrorKind::InvalidUrl)
            .with_url(url)
            .with_source(err)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (url: https://...)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::InvalidUrl => "Invalid URL",
            StorageErrorKind::Unavailable => "Unavailable",
            StorageErrorKind::Timeout => "Timeout",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(url) = &self.url {
            write!(f, " (url: {url})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Documentation storage as seen from the page reader.
///
/// Both operations are asynchronous: a real backend answers them over the
/// network. Callers await them one at a time.
pub trait TechDocsStorage {
    /// Origin serving documentation static assets
    /// (e.g. `http://localhost:7007/api/techdocs`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the origin cannot be discovered.
    fn api_origin(&self) -> impl Future<Output = Result<String, StorageError>>;

    /// Resolve `old_base_url` (a raw `src`/`href` value from a rendered page)
    /// to an absolute URL served by the backend.
    ///
    /// # Arguments
    ///
    /// * `old_base_url` - attribute value as written in the page
    /// * `entity` - entity owning the documentation site
    /// * `path` - page path inside the site (e.g. `"guide/"`, `""` for root)
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL cannot be built.
    fn base_url(
        &self,
        old_base_url: &str,
        entity: &EntityName,
        path: &str,
    ) -> impl Future<Output = Result<String, StorageError>>;
}
