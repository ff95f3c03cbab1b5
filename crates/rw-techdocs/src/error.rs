//! Transformer error type.

use rw_dom::DomError;
use rw_storage::StorageError;

/// Error returned by a transformer pass.
///
/// Missing optional elements (no edit link, no stylesheets, no `href`) are
/// not errors; a pass simply has nothing to do.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Storage lookup failed.
    #[error("storage lookup failed: {0}")]
    Storage(#[from] StorageError),
    /// Document manipulation failed.
    #[error("document error: {0}")]
    Dom(#[from] DomError),
    /// A URL could not be parsed or resolved.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
