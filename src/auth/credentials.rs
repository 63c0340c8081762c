//! Credential management for TravelTime API authentication.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::error::TravelTimeError;

/// Default environment variable holding the application id.
pub const APP_ID_VAR: &str = "TRAVELTIME_APP_ID";
/// Default environment variable holding the api key.
pub const API_KEY_VAR: &str = "TRAVELTIME_API_KEY";

/// API credentials containing the application id and api key.
#[derive(Clone)]
pub struct Credentials {
    /// The application id (public identifier)
    pub app_id: String,
    /// The api key (private)
    api_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an application id and api key.
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Get the api key.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Check that both parts are present.
    pub fn validate(&self) -> Result<(), TravelTimeError> {
        if self.app_id.trim().is_empty() || self.expose_key().trim().is_empty() {
            return Err(TravelTimeError::Config(
                "Credentials must be valid: application id and api key are required".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing API credentials.
///
/// Implement this trait to customize how credentials are retrieved,
/// for example from a secrets manager.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

/// Static credentials provider that holds credentials directly.
#[derive(Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(app_id, api_key),
        }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl CredentialsProvider for Arc<StaticCredentials> {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials provider that reads from environment variables.
///
/// By default, reads from `TRAVELTIME_APP_ID` and `TRAVELTIME_API_KEY`.
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Create credentials from the default environment variables.
    pub fn from_env() -> Result<Self, TravelTimeError> {
        Self::from_env_vars(APP_ID_VAR, API_KEY_VAR)
    }

    /// Create credentials from custom environment variable names.
    pub fn from_env_vars(app_id_var: &str, api_key_var: &str) -> Result<Self, TravelTimeError> {
        Self::try_from_env_vars(app_id_var, api_key_var).ok_or_else(|| {
            TravelTimeError::Config(format!(
                "Environment variables {app_id_var} and {api_key_var} must be set"
            ))
        })
    }

    /// Try to create credentials from the default environment variables.
    ///
    /// Returns `None` if the environment variables are not set.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_vars(APP_ID_VAR, API_KEY_VAR)
    }

    /// Try to create credentials from custom environment variable names.
    ///
    /// Returns `None` if the environment variables are not set.
    pub fn try_from_env_vars(app_id_var: &str, api_key_var: &str) -> Option<Self> {
        let app_id = std::env::var(app_id_var).ok()?;
        let api_key = std::env::var(api_key_var).ok()?;

        Some(Self {
            credentials: Credentials::new(app_id, api_key),
        })
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("my_app", "super_secret");
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("my_app"));
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_static_credentials() {
        let provider = StaticCredentials::new("app", "key");
        let creds = provider.get_credentials();
        assert_eq!(creds.app_id, "app");
        assert_eq!(creds.expose_key(), "key");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(matches!(
            Credentials::new("", "key").validate(),
            Err(TravelTimeError::Config(_))
        ));
        assert!(Credentials::new("app", "  ").validate().is_err());
    }

    #[test]
    fn test_missing_env_vars() {
        let (app, key) = ("TT_TEST_UNSET_APP", "TT_TEST_UNSET_KEY");
        assert!(EnvCredentials::try_from_env_vars(app, key).is_none());
        assert!(EnvCredentials::from_env_vars(app, key).is_err());
    }
}
