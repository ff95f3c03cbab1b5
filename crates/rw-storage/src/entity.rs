//! Entity references owning documentation sites.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Namespace used when a reference omits it.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Identity of the catalog entity that owns a documentation site.
///
/// String form is `kind:namespace/name`; `kind:name` implies the
/// [`DEFAULT_NAMESPACE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityName {
    /// Entity kind (e.g., "Component").
    pub kind: String,
    /// Entity namespace.
    pub namespace: String,
    /// Entity name.
    pub name: String,
}

/// Error returned when parsing an entity reference.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid entity reference `{input}`: {reason}")]
pub struct EntityNameError {
    /// Reference as given.
    pub input: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

impl EntityName {
    /// Create an entity name from its parts.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parse `kind:namespace/name` or `kind:name`.
    ///
    /// # Errors
    ///
    /// Returns [`EntityNameError`] if the kind or name is missing or empty.
    pub fn parse(input: &str) -> Result<Self, EntityNameError> {
        let error = |reason| EntityNameError {
            input: input.to_owned(),
            reason,
        };

        let (kind, rest) = input.split_once(':').ok_or_else(|| error("missing kind"))?;
        let (namespace, name) = rest.split_once('/').unwrap_or((DEFAULT_NAMESPACE, rest));

        if kind.is_empty() {
            return Err(error("empty kind"));
        }
        if namespace.is_empty() {
            return Err(error("empty namespace"));
        }
        if name.is_empty() || name.contains('/') {
            return Err(error("invalid name"));
        }

        Ok(Self::new(kind, namespace, name))
    }
}

impl FromStr for EntityName {
    type Err = EntityNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.namespace, self.name)
    }
}
