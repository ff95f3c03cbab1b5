//! Configuration management for RW page transformers.
//!
//! Parses `rw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Host-provided settings can be applied during load via [`ConfigOverrides`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `storage.api_origin`
//! - `integrations.github[].host`
//! - `integrations.gitlab[].host`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    /// Override documentation API origin.
    pub api_origin: Option<String>,
    /// Override feedback link enabled flag.
    pub feedback_enabled: Option<bool>,
    /// Extra style rules appended to the configured ones.
    pub extra_style_rules: Vec<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Default documentation API origin.
pub const DEFAULT_API_ORIGIN: &str = "http://localhost:7007/api/techdocs";

/// Host of the public GitHub integration.
pub const DEFAULT_GITHUB_HOST: &str = "github.com";

/// Host of the public GitLab integration.
pub const DEFAULT_GITLAB_HOST: &str = "gitlab.com";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation storage configuration.
    pub storage: StorageConfig,
    /// Source control integrations.
    pub integrations: IntegrationsConfig,
    /// Feedback link configuration.
    pub feedback: FeedbackConfig,
    /// Style injection configuration.
    pub styles: StylesConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Documentation storage configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Origin serving documentation static assets.
    pub api_origin: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_owned(),
        }
    }
}

/// A single source control host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntegrationConfig {
    /// Host name, optionally with port (e.g., "github.com", "git.example.com:8443").
    pub host: String,
}

impl IntegrationConfig {
    fn new(host: &str) -> Self {
        Self {
            host: host.to_owned(),
        }
    }
}

/// Source control integrations by provider.
///
/// The public `github.com` and `gitlab.com` hosts are always present.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// GitHub (and GitHub Enterprise) hosts.
    pub github: Vec<IntegrationConfig>,
    /// GitLab hosts.
    pub gitlab: Vec<IntegrationConfig>,
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            github: vec![IntegrationConfig::new(DEFAULT_GITHUB_HOST)],
            gitlab: vec![IntegrationConfig::new(DEFAULT_GITLAB_HOST)],
        }
    }
}

impl IntegrationsConfig {
    /// Add the public hosts if the file did not list them.
    fn add_defaults(&mut self) {
        fn ensure(list: &mut Vec<IntegrationConfig>, host: &str) {
            if !list.iter().any(|i| i.host.eq_ignore_ascii_case(host)) {
                list.push(IntegrationConfig::new(host));
            }
        }
        ensure(&mut self.github, DEFAULT_GITHUB_HOST);
        ensure(&mut self.gitlab, DEFAULT_GITLAB_HOST);
    }
}

/// Feedback link configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Whether the feedback link is rendered next to the edit link.
    pub enabled: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Style injection configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// CSS rules appended after the built-in theme rules.
    pub extra_rules: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`storage.api_origin`").
        field: String,
        /// Error message (e.g., "${`TECHDOCS_API_ORIGIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a host field to be a bare host without scheme or path.
fn require_bare_host(host: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(host, field)?;
    if host.contains("://") || host.contains('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must be a host name without scheme or path"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents.
    ///
    /// Overrides are applied after loading, taking precedence over config
    /// file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(api_origin) = &overrides.api_origin {
            self.storage.api_origin.clone_from(api_origin);
        }
        if let Some(enabled) = overrides.feedback_enabled {
            self.feedback.enabled = enabled;
        }
        self.styles
            .extra_rules
            .extend(overrides.extra_style_rules.iter().cloned());
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;
        config.integrations.add_defaults();
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.storage.api_origin, "storage.api_origin")?;
        require_http_url(&self.storage.api_origin, "storage.api_origin")?;

        for integration in &self.integrations.github {
            require_bare_host(&integration.host, "integrations.github.host")?;
        }
        for integration in &self.integrations.gitlab {
            require_bare_host(&integration.host, "integrations.gitlab.host")?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.storage.api_origin =
            expand::expand_env(&self.storage.api_origin, "storage.api_origin")?;

        for integration in &mut self.integrations.github {
            integration.host = expand::expand_env(&integration.host, "integrations.github.host")?;
        }
        for integration in &mut self.integrations.gitlab {
            integration.host = expand::expand_env(&integration.host, "integrations.gitlab.host")?;
        }

        Ok(())
    }
}
