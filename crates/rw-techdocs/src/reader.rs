//! Page identity and host collaborators.

use std::fmt;

use rw_storage::EntityName;
use url::Url;

/// Identity of the page being read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReaderState {
    /// Entity owning the documentation site.
    pub entity: EntityName,
    /// Page path inside the site (e.g. `"guide/"`, `""` for the home page).
    pub path: String,
}

impl ReaderState {
    /// Create a reader state.
    #[must_use]
    pub fn new(entity: EntityName, path: impl Into<String>) -> Self {
        Self {
            entity,
            path: path.into(),
        }
    }
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.path)
    }
}

/// Browser window as seen by the transformers.
pub trait Window {
    /// Current page URL.
    fn location(&self) -> Url;

    /// Open `url` in the browsing context named `target` (e.g. `"_blank"`).
    fn open(&self, url: &str, target: &str);

    /// Serialized origin of the current page (e.g. `http://localhost:3000`).
    fn origin(&self) -> String {
        self.location().origin().ascii_serialization()
    }
}

/// In-app navigation without a full page load.
pub trait Navigator {
    /// Navigate to a path with optional fragment (e.g. `/docs/guide#setup`).
    fn navigate(&self, to: &str);
}
