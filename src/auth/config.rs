//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Secret for HS256 token signing. Supports `env:VAR_NAME` indirection.
    /// REQUIRED to serve.
    pub jwt_secret: Option<String>,

    /// Allowed CORS origins. If empty, any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl AuthConfig {
    /// Resolve the signing secret, expanding `env:VAR_NAME` syntax.
    pub fn resolve_jwt_secret(&self) -> Result<Option<String>, ConfigValidationError> {
        match &self.jwt_secret {
            None => Ok(None),
            Some(value) => {
                if let Some(var_name) = value.strip_prefix("env:") {
                    match std::env::var(var_name) {
                        Ok(secret) if !secret.is_empty() => Ok(Some(secret)),
                        Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
                        Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
                    }
                } else {
                    Ok(Some(value.clone()))
                }
            }
        }
    }

    /// Validate the configuration and return the resolved secret.
    pub fn validate(&self) -> Result<String, ConfigValidationError> {
        self.resolve_jwt_secret()?
            .ok_or(ConfigValidationError::MissingJwtSecret)
    }
}

/// Errors produced by [`AuthConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("auth.jwt_secret is not configured; set it in the config file or via INKWELL_AUTH__JWT_SECRET")]
    MissingJwtSecret,

    #[error("environment variable '{0}' referenced by auth.jwt_secret is not set")]
    EnvVarNotFound(String),

    #[error("environment variable '{0}' referenced by auth.jwt_secret is empty")]
    EnvVarEmpty(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_secret() {
        let config = AuthConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingJwtSecret)
        ));
    }

    #[test]
    fn test_literal_secret_resolves() {
        let config = AuthConfig {
            jwt_secret: Some("hunter2hunter2".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap(), "hunter2hunter2");
    }

    #[test]
    fn test_env_indirection_missing_var() {
        let config = AuthConfig {
            jwt_secret: Some("env:INKWELL_TEST_SECRET_THAT_DOES_NOT_EXIST".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EnvVarNotFound(_))
        ));
    }
}
