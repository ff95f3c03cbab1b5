//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without a documentation backend.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::client::TechDocsStorageClient;
use crate::entity::EntityName;
use crate::storage::{StorageError, StorageErrorKind, TechDocsStorage};

/// API origin used when none is configured.
const DEFAULT_API_ORIGIN: &str = "http://localhost:7007/api/techdocs";

/// A recorded [`TechDocsStorage::base_url`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrlRequest {
    /// Attribute value passed in.
    pub old_base_url: String,
    /// Entity passed in.
    pub entity: EntityName,
    /// Page path passed in.
    pub path: String,
}

/// Mock storage for testing.
///
/// Answers from in-memory tables and records every call. Values without an
/// explicit mapping are resolved the same way [`TechDocsStorageClient`] does.
///
/// # Example
///
/// ```ignore
/// use rw_storage::{EntityName, MockStorage, TechDocsStorage};
///
/// let storage = MockStorage::new()
///     .with_api_origin("https://api.example.com")
///     .with_base_url("img.png", "https://cdn.example.com/img.png");
///
/// let url = storage.base_url("img.png", &entity, "").await?;
/// assert_eq!(storage.requests().len(), 1);
/// ```
#[derive(Debug)]
pub struct MockStorage {
    api_origin: RwLock<String>,
    base_urls: RwLock<HashMap<String, String>>,
    api_origin_failure: RwLock<Option<StorageErrorKind>>,
    base_url_failures: RwLock<HashMap<String, StorageErrorKind>>,
    requests: RwLock<Vec<BaseUrlRequest>>,
    api_origin_calls: RwLock<usize>,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self {
            api_origin: RwLock::new(DEFAULT_API_ORIGIN.to_owned()),
            base_urls: RwLock::new(HashMap::new()),
            api_origin_failure: RwLock::new(None),
            base_url_failures: RwLock::new(HashMap::new()),
            requests: RwLock::new(Vec::new()),
            api_origin_calls: RwLock::new(0),
        }
    }
}

impl MockStorage {
    /// Create a new mock storage with the default API origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API origin.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_api_origin(self, origin: impl Into<String>) -> Self {
        *self.api_origin.write().unwrap() = origin.into();
        self
    }

    /// Map an attribute value to a fixed resolved URL.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_base_url(self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.base_urls
            .write()
            .unwrap()
            .insert(old.into(), new.into());
        self
    }

    /// Make [`TechDocsStorage::api_origin`] fail with `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_api_origin_failure(self, kind: StorageErrorKind) -> Self {
        *self.api_origin_failure.write().unwrap() = Some(kind);
        self
    }

    /// Make [`TechDocsStorage::base_url`] fail with `kind` for one attribute value.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_base_url_failure(self, old: impl Into<String>, kind: StorageErrorKind) -> Self {
        self.base_url_failures
            .write()
            .unwrap()
            .insert(old.into(), kind);
        self
    }

    /// All `base_url` calls so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<BaseUrlRequest> {
        self.requests.read().unwrap().clone()
    }

    /// Number of `api_origin` calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn api_origin_calls(&self) -> usize {
        *self.api_origin_calls.read().unwrap()
    }
}

impl TechDocsStorage for MockStorage {
    async fn api_origin(&self) -> Result<String, StorageError> {
        *self.api_origin_calls.write().unwrap() += 1;

        if let Some(kind) = *self.api_origin_failure.read().unwrap() {
            return Err(StorageError::new(kind).with_backend("Mock"));
        }
        Ok(self.api_origin.read().unwrap().clone())
    }

    async fn base_url(
        &self,
        old_base_url: &str,
        entity: &EntityName,
        path: &str,
    ) -> Result<String, StorageError> {
        self.requests.write().unwrap().push(BaseUrlRequest {
            old_base_url: old_base_url.to_owned(),
            entity: entity.clone(),
            path: path.to_owned(),
        });

        if let Some(kind) = self.base_url_failures.read().unwrap().get(old_base_url) {
            return Err(StorageError::new(*kind)
                .with_backend("Mock")
                .with_url(old_base_url));
        }
        if let Some(new) = self.base_urls.read().unwrap().get(old_base_url) {
            return Ok(new.clone());
        }

        let origin = self.api_origin.read().unwrap().clone();
        TechDocsStorageClient::new(origin)
            .base_url(old_base_url, entity, path)
            .await
    }
}
