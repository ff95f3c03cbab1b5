//! Documentation storage abstraction for the page reader.
//!
//! This crate provides a [`TechDocsStorage`] trait describing what page
//! transformers need from the documentation backend:
//!
//! - the **API origin** serving static documentation assets
//! - **base URL resolution** of raw `src`/`href` values found in a page
//!
//! # Architecture
//!
//! The crate provides:
//! - [`EntityName`] identifying the entity that owns a documentation site
//! - [`TechDocsStorage`] trait with `api_origin()` and `base_url()` methods
//! - [`TechDocsStorageClient`] resolving against a configured API origin
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use rw_storage::{EntityName, TechDocsStorage, TechDocsStorageClient};
//!
//! let storage = TechDocsStorageClient::new("http://localhost:7007/api/techdocs");
//! let entity: EntityName = "component:default/backstage".parse()?;
//! let url = storage.base_url("img/logo.png", &entity, "guide/").await?;
//! ```

mod client;
mod entity;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use client::{TechDocsStorageClient, URI_COMPONENT, encode_uri_component};
pub use entity::{DEFAULT_NAMESPACE, EntityName, EntityNameError};
#[cfg(feature = "mock")]
pub use mock::{BaseUrlRequest, MockStorage};
pub use storage::{StorageError, StorageErrorKind, TechDocsStorage};
