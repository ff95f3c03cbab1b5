//! Environment variable expansion for configuration strings.

use std::env::VarError;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config field for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| {
            let message = match e.cause {
                VarError::NotPresent => format!("${{{}}} not set", e.var_name),
                VarError::NotUnicode(_) => format!("${{{}}} is not valid unicode", e.var_name),
            };
            ConfigError::EnvVar {
                field: field.to_owned(),
                message,
            }
        })
}
