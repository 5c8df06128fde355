//! Writing rotated values back to the vault

use crate::core::{SecretValue, VaultError, VaultLocation};
use crate::traits::VaultClient;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Publishes rotated values as new versions of their vault secret
///
/// The tag map is carried forward verbatim from the matched record: tags
/// are never computed fresh, so the identity linkage keeps working after
/// every rotation.
pub struct SecretPersister {
    vault: Arc<dyn VaultClient>,
    location: VaultLocation,
}

impl SecretPersister {
    /// Create a persister over the given vault
    pub fn new(vault: Arc<dyn VaultClient>, location: VaultLocation) -> Self {
        Self { vault, location }
    }

    /// Write `value` as a new version of the secret named `name`
    pub async fn persist(
        &self,
        name: &str,
        value: &SecretValue,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), VaultError> {
        debug!(secret = %name, "setting new value for vault secret");
        self.vault
            .set_secret(&self.location, name, value, tags)
            .await?;
        info!(secret = %name, "updated secret with a new value in the vault");
        Ok(())
    }
}
