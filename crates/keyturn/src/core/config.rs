//! Engine configuration

use crate::core::{ValidationError, VaultLocation};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default base name for rotated credentials
const DEFAULT_KEY_NAME_BASE: &str = "RotatedKey";

/// Default validity window for rotated credentials
const DEFAULT_CREDENTIAL_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Environment variable holding the vault URL
const ENV_VAULT_URL: &str = "KEYTURN_VAULT_URL";
/// Environment variable overriding the credential base name
const ENV_KEY_NAME_BASE: &str = "KEYTURN_KEY_NAME_BASE";
/// Environment variable overriding the credential lifetime (humantime syntax)
const ENV_CREDENTIAL_LIFETIME: &str = "KEYTURN_CREDENTIAL_LIFETIME";

/// Rotation engine configuration
///
/// # Examples
///
/// ```
/// use keyturn::core::{RotatorConfig, VaultLocation};
/// use std::time::Duration;
///
/// let config = RotatorConfig::new(VaultLocation::parse("https://vault.example.net")?)
///     .with_credential_lifetime(Duration::from_secs(3600));
/// config.validate()?;
/// # Ok::<(), keyturn::core::ValidationError>(())
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotatorConfig {
    /// Vault the secrets live in
    pub vault_location: VaultLocation,

    /// Base name for newly allocated credentials; the allocator appends the
    /// smallest free integer suffix
    #[serde(default = "default_key_name_base")]
    pub key_name_base: String,

    /// Validity window stamped onto newly registered credentials
    #[serde(default = "default_credential_lifetime", with = "humantime_serde")]
    pub credential_lifetime: Duration,
}

fn default_key_name_base() -> String {
    DEFAULT_KEY_NAME_BASE.to_string()
}

fn default_credential_lifetime() -> Duration {
    DEFAULT_CREDENTIAL_LIFETIME
}

impl RotatorConfig {
    /// Create a configuration with defaults for everything but the vault
    pub fn new(vault_location: VaultLocation) -> Self {
        Self {
            vault_location,
            key_name_base: default_key_name_base(),
            credential_lifetime: default_credential_lifetime(),
        }
    }

    /// Override the credential base name
    pub fn with_key_name_base(mut self, base: impl Into<String>) -> Self {
        self.key_name_base = base.into();
        self
    }

    /// Override the credential lifetime
    pub fn with_credential_lifetime(mut self, lifetime: Duration) -> Self {
        self.credential_lifetime = lifetime;
        self
    }

    /// Validate field values
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_name_base.trim().is_empty() {
            return Err(ValidationError::InvalidConfig {
                field: "key_name_base".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.credential_lifetime.is_zero() {
            return Err(ValidationError::InvalidConfig {
                field: "credential_lifetime".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Build a configuration from environment variables
    ///
    /// `KEYTURN_VAULT_URL` is required; `KEYTURN_KEY_NAME_BASE` and
    /// `KEYTURN_CREDENTIAL_LIFETIME` (humantime syntax, e.g. `5m` or `12h`)
    /// override the defaults.
    pub fn from_env() -> Result<Self, ValidationError> {
        let vault_url = env::var(ENV_VAULT_URL).map_err(|_| ValidationError::InvalidConfig {
            field: "vault_location".to_string(),
            reason: format!("environment variable '{ENV_VAULT_URL}' is not set"),
        })?;

        let mut config = Self::new(VaultLocation::parse(&vault_url)?);

        if let Ok(base) = env::var(ENV_KEY_NAME_BASE) {
            config.key_name_base = base;
        }

        if let Ok(raw) = env::var(ENV_CREDENTIAL_LIFETIME) {
            config.credential_lifetime =
                humantime::parse_duration(&raw).map_err(|e| ValidationError::InvalidConfig {
                    field: "credential_lifetime".to_string(),
                    reason: format!("'{raw}' is not a valid duration: {e}"),
                })?;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> VaultLocation {
        VaultLocation::parse("https://vault.example.net").unwrap()
    }

    #[test]
    fn defaults_match_reference_deployment() {
        let config = RotatorConfig::new(vault());
        assert_eq!(config.key_name_base, "RotatedKey");
        assert_eq!(config.credential_lifetime, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_base_name() {
        let config = RotatorConfig::new(vault()).with_key_name_base("  ");
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidConfig { field, .. }) if field == "key_name_base"
        ));
    }

    #[test]
    fn rejects_zero_lifetime() {
        let config = RotatorConfig::new(vault()).with_credential_lifetime(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidConfig { field, .. }) if field == "credential_lifetime"
        ));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: RotatorConfig =
            serde_json::from_str(r#"{"vault_location": "https://vault.example.net/"}"#).unwrap();
        assert_eq!(config.key_name_base, "RotatedKey");
        assert_eq!(config.credential_lifetime, Duration::from_secs(300));
    }

    #[test]
    fn deserializes_humantime_lifetime() {
        let config: RotatorConfig = serde_json::from_str(
            r#"{"vault_location": "https://vault.example.net/", "credential_lifetime": "12h"}"#,
        )
        .unwrap();
        assert_eq!(config.credential_lifetime, Duration::from_secs(12 * 3600));
    }
}
