//! Secret vault seam

use crate::core::{SecretRecord, SecretValue, VaultError, VaultLocation};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// One page of a vault enumeration
#[derive(Debug, Clone, Default)]
pub struct SecretPage {
    /// Records on this page
    pub secrets: Vec<SecretRecord>,
    /// Opaque continuation token; `None` on the last page
    pub continuation: Option<String>,
}

/// Client for the vault holding the published secrets
///
/// Implementations must be `Send + Sync` so they can be shared as
/// `Arc<dyn VaultClient>` across async tasks.
#[async_trait]
pub trait VaultClient: Send + Sync {
    /// Fetch one page of secrets
    ///
    /// Pass `None` for the first page and the previous page's
    /// [`SecretPage::continuation`] for each page after it.
    async fn list_secrets(
        &self,
        location: &VaultLocation,
        continuation: Option<&str>,
    ) -> Result<SecretPage, VaultError>;

    /// Write `value` as a new version of the secret named `name`
    ///
    /// The write supersedes the current version in place; prior versions
    /// stay readable on the vault side. `tags` are attached exactly as
    /// given.
    async fn set_secret(
        &self,
        location: &VaultLocation,
        name: &str,
        value: &SecretValue,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), VaultError>;
}
