//! Secret material: values, vault records and vault addressing

use crate::core::{IdentityId, ValidationError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use subtle::ConstantTimeEq;
use url::Url;

/// Tag key linking a vault secret to the application identity that owns it.
///
/// At most one secret per identity may carry this tag; the value is the
/// identity's directory object id. The tag is carried forward verbatim on
/// every rewrite so discovery keeps working after rotation.
pub const APPLICATION_OBJECT_ID_TAG: &str = "ApplicationObjectId";

/// Secret value that zeros memory on drop
///
/// `Debug` is redacted and equality is constant-time only; there is no
/// `PartialEq` on purpose.
#[derive(Clone)]
pub struct SecretValue(SecretString);

impl SecretValue {
    /// Create new secret value
    pub fn new(s: impl Into<String>) -> Self {
        Self(SecretString::from(s.into()))
    }

    /// Expose the secret (use with caution)
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Constant-time equality check
    pub fn eq_ct(&self, other: &Self) -> bool {
        let a = self.0.expose_secret().as_bytes();
        let b = other.0.expose_secret().as_bytes();
        a.ct_eq(b).into()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = B64.encode(self.0.expose_secret().as_bytes());
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let decoded = B64
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)?;
        let s = String::from_utf8(decoded).map_err(serde::de::Error::custom)?;
        Ok(SecretValue::new(s))
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue[REDACTED]")
    }
}

/// Address of the vault holding the secrets
///
/// Wraps the vault base URL the way the original deployment referenced its
/// vault by URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultLocation(Url);

impl VaultLocation {
    /// Parse a vault location from a URL string
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(input).map_err(|e| ValidationError::InvalidConfig {
            field: "vault_location".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(url))
    }

    /// The underlying URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl From<Url> for VaultLocation {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl fmt::Display for VaultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vault entry: name, opaque value and tag map
///
/// Owned by the vault. Rotation never creates or deletes records; it only
/// supersedes their value in place, preserving tags. Each write creates a
/// new version on the vault side; prior versions remain readable but
/// superseded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecretRecord {
    /// Secret name, unique within the vault
    pub name: String,
    /// Current opaque value
    pub value: SecretValue,
    /// Tag map; the linkage tag lives here
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl SecretRecord {
    /// The object id of the owning identity, if the linkage tag is present
    pub fn application_object_id(&self) -> Option<&str> {
        self.tags.get(APPLICATION_OBJECT_ID_TAG).map(String::as_str)
    }

    /// Whether this record carries the linkage tag for the given identity
    pub fn is_tagged_for(&self, id: &IdentityId) -> bool {
        self.application_object_id() == Some(id.as_str())
    }
}
