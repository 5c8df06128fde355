//! Application identities and their password credentials

use crate::core::{SecretValue, ValidationError};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Maximum length for identity object ids
const MAX_ID_LENGTH: usize = 255;

/// Validated directory object id of an application identity
///
/// Object ids arrive from the directory as opaque strings (typically GUIDs)
/// and travel onward as vault tag values; validation keeps them to a
/// conservative character set so they are safe in both places.
///
/// # Examples
///
/// ```
/// use keyturn::core::IdentityId;
///
/// let id = IdentityId::new("7f3e9c2a-5b1d-4e8f-9a6c-0d2b4f6e8a1c").unwrap();
/// assert!(IdentityId::new("").is_err());
/// assert!(IdentityId::new("id with spaces").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityId(String);

impl IdentityId {
    /// Creates a new validated identity id
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyIdentityId`] for an empty input and
    /// [`ValidationError::InvalidIdentityId`] when the input is over-long or
    /// contains characters outside alphanumerics, hyphens and underscores.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();

        if id.is_empty() {
            return Err(ValidationError::EmptyIdentityId);
        }

        if id.len() > MAX_ID_LENGTH {
            return Err(ValidationError::InvalidIdentityId {
                id,
                reason: format!("exceeds maximum length of {MAX_ID_LENGTH} characters"),
            });
        }

        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidIdentityId {
                id,
                reason:
                    "contains invalid characters (only alphanumeric, hyphens, underscores allowed)"
                        .to_string(),
            });
        }

        Ok(Self(id))
    }

    /// Returns the id as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<IdentityId> for String {
    fn from(id: IdentityId) -> Self {
        id.0
    }
}

impl TryFrom<String> for IdentityId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        IdentityId::new(s)
    }
}

/// One password credential on an application identity
///
/// A named secret value plus a validity window; an identity can hold several
/// simultaneously valid entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PasswordCredential {
    /// Credential name, unique within the identity
    pub name: String,
    /// Opaque secret value
    pub value: SecretValue,
    /// Start of the validity window (UTC)
    pub valid_from: DateTime<Utc>,
    /// Length of the validity window
    #[serde(with = "humantime_serde")]
    pub lifetime: Duration,
}

impl PasswordCredential {
    /// End of the validity window, if representable
    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        TimeDelta::from_std(self.lifetime)
            .ok()
            .map(|delta| self.valid_from + delta)
    }
}

/// A directory-registered service principal
///
/// Owned by the identity provider; rotation never creates or deletes
/// identities, it only appends credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApplicationIdentity {
    /// Stable directory object id
    pub object_id: IdentityId,
    /// Human-readable name, for logging
    pub display_name: String,
    /// All currently registered password credentials
    pub credentials: Vec<PasswordCredential>,
}

impl ApplicationIdentity {
    /// Names of all registered credentials
    pub fn credential_names(&self) -> BTreeSet<String> {
        self.credentials.iter().map(|c| c.name.clone()).collect()
    }

    /// Whether a credential with the given name is registered
    pub fn has_credential(&self, name: &str) -> bool {
        self.credentials.iter().any(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(name: &str) -> PasswordCredential {
        PasswordCredential {
            name: name.to_string(),
            value: SecretValue::new("placeholder"),
            valid_from: Utc::now(),
            lifetime: Duration::from_secs(300),
        }
    }

    #[test]
    fn valid_identity_ids() {
        assert!(IdentityId::new("7f3e9c2a-5b1d-4e8f-9a6c-0d2b4f6e8a1c").is_ok());
        assert!(IdentityId::new("app_1").is_ok());
        assert!(IdentityId::new("a").is_ok());
    }

    #[test]
    fn invalid_identity_ids() {
        assert!(matches!(
            IdentityId::new(""),
            Err(ValidationError::EmptyIdentityId)
        ));
        assert!(matches!(
            IdentityId::new("id with spaces"),
            Err(ValidationError::InvalidIdentityId { .. })
        ));
        assert!(matches!(
            IdentityId::new("../escape"),
            Err(ValidationError::InvalidIdentityId { .. })
        ));
        assert!(IdentityId::new("a".repeat(256)).is_err());
        assert!(IdentityId::new("a".repeat(255)).is_ok());
    }

    #[test]
    fn identity_id_serde_rejects_invalid() {
        let ok: Result<IdentityId, _> = serde_json::from_str("\"app-1\"");
        assert!(ok.is_ok());
        let bad: Result<IdentityId, _> = serde_json::from_str("\"two words\"");
        assert!(bad.is_err());
    }

    #[test]
    fn credential_validity_window() {
        let cred = credential("RotatedKey1");
        let until = cred.valid_until().expect("representable");
        assert_eq!(until - cred.valid_from, TimeDelta::seconds(300));
    }

    #[test]
    fn credential_names_are_a_set() {
        let identity = ApplicationIdentity {
            object_id: IdentityId::new("app-1").unwrap(),
            display_name: "payments".to_string(),
            credentials: vec![credential("RotatedKey2"), credential("RotatedKey1")],
        };
        let names: Vec<String> = identity.credential_names().into_iter().collect();
        assert_eq!(names, ["RotatedKey1", "RotatedKey2"]);
        assert!(identity.has_credential("RotatedKey1"));
        assert!(!identity.has_credential("RotatedKey3"));
    }
}
