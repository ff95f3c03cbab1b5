//! Source control integrations.
//!
//! Maps a URL to the hosting provider serving it, so the feedback link knows
//! how to build an issue-creation URL.

use std::fmt;

use rw_config::IntegrationsConfig;
use url::Url;

/// Supported hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScmIntegrationKind {
    /// GitHub or GitHub Enterprise.
    GitHub,
    /// GitLab.
    GitLab,
}

impl ScmIntegrationKind {
    /// Provider identifier as used in configuration (`github`, `gitlab`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
        }
    }
}

impl fmt::Display for ScmIntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScmIntegration {
    /// Provider kind.
    pub kind: ScmIntegrationKind,
    /// Host name as configured (lowercased, without port).
    pub host: String,
}

/// Resolves URLs to integrations.
pub trait ScmIntegrations {
    /// Integration serving `url`, if any.
    fn by_url(&self, url: &Url) -> Option<ScmIntegration>;
}

/// Integrations built from configuration.
///
/// Hosts match case-insensitively; ports are ignored on both sides.
#[derive(Debug, Clone, Default)]
pub struct ScmIntegrationRegistry {
    integrations: Vec<ScmIntegration>,
}

fn bare_host(host: &str) -> String {
    let host = host.rsplit_once(':').map_or(host, |(name, port)| {
        if port.chars().all(|c| c.is_ascii_digit()) {
            name
        } else {
            host
        }
    });
    host.to_ascii_lowercase()
}

impl ScmIntegrationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the `[integrations]` configuration section.
    #[must_use]
    pub fn from_config(config: &IntegrationsConfig) -> Self {
        let github = config
            .github
            .iter()
            .map(|i| (ScmIntegrationKind::GitHub, i.host.as_str()));
        let gitlab = config
            .gitlab
            .iter()
            .map(|i| (ScmIntegrationKind::GitLab, i.host.as_str()));

        github
            .chain(gitlab)
            .fold(Self::new(), |registry, (kind, host)| registry.with(kind, host))
    }

    /// Add an integration.
    #[must_use]
    pub fn with(mut self, kind: ScmIntegrationKind, host: &str) -> Self {
        self.integrations.push(ScmIntegration {
            kind,
            host: bare_host(host),
        });
        self
    }

    /// Registered integrations in registration order.
    #[must_use]
    pub fn integrations(&self) -> &[ScmIntegration] {
        &self.integrations
    }
}

impl ScmIntegrations for ScmIntegrationRegistry {
    fn by_url(&self, url: &Url) -> Option<ScmIntegration> {
        let host = url.host_str()?.to_ascii_lowercase();
        self.integrations.iter().find(|i| i.host == host).cloned()
    }
}
