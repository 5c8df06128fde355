//! Paginated enumeration of all secrets in the vault

use crate::core::{SecretRecord, VaultError, VaultLocation};
use crate::traits::VaultClient;
use std::sync::Arc;
use tracing::debug;

/// Enumerates every secret the vault holds
///
/// Follows continuation tokens until the vault reports no further page and
/// concatenates all pages into one result. A failure on any page fetch
/// aborts the whole enumeration; callers must never act on a truncated
/// list, because a missing page could hide a second secret claiming the
/// same identity.
pub struct SecretCatalog {
    vault: Arc<dyn VaultClient>,
    location: VaultLocation,
}

impl SecretCatalog {
    /// Create a catalog over the given vault
    pub fn new(vault: Arc<dyn VaultClient>, location: VaultLocation) -> Self {
        Self { vault, location }
    }

    /// The vault location this catalog enumerates
    pub fn location(&self) -> &VaultLocation {
        &self.location
    }

    /// Fetch all secrets, following continuation tokens until exhausted
    pub async fn list_all(&self) -> Result<Vec<SecretRecord>, VaultError> {
        debug!(location = %self.location, "listing all secrets from the vault");

        let mut all = Vec::new();
        let mut page = self.vault.list_secrets(&self.location, None).await?;

        loop {
            all.extend(page.secrets);
            match page.continuation {
                Some(token) => {
                    debug!("found another page of secrets, following continuation");
                    page = self.vault.list_secrets(&self.location, Some(&token)).await?;
                }
                None => break,
            }
        }

        debug!(count = all.len(), "vault enumeration complete");
        Ok(all)
    }
}
