//! Configurable in-memory mocks for the directory and the vault

use crate::core::{
    ApplicationIdentity, DirectoryError, IdentityId, PasswordCredential, SecretRecord, SecretValue,
    VaultError, VaultLocation,
};
use crate::traits::{DirectoryClient, SecretPage, VaultClient};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Mock identity provider with configurable failure behavior
///
/// `replace_credentials` has the modeled providers' native semantics: the
/// submitted list replaces the stored one wholesale, with no merging.
#[derive(Default)]
pub struct MockDirectory {
    identities: Arc<DashMap<String, ApplicationIdentity>>,
    forbidden: Arc<DashSet<String>>,
    fail_on_replace: Arc<AtomicBool>,
    get_count: Arc<AtomicU32>,
    replace_count: Arc<AtomicU32>,
}

impl MockDirectory {
    /// Create new mock directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) an identity
    pub fn insert_identity(&self, identity: ApplicationIdentity) {
        self.identities
            .insert(identity.object_id.to_string(), identity);
    }

    /// Deny all credential updates for one identity
    pub fn forbid_updates_for(&self, id: &IdentityId) {
        self.forbidden.insert(id.to_string());
    }

    /// Make the next credential update fail with a generic provider error
    pub fn fail_next_replace(&self) {
        self.fail_on_replace.store(true, Ordering::SeqCst);
    }

    /// Number of identity reads
    pub fn get_count(&self) -> u32 {
        self.get_count.load(Ordering::SeqCst)
    }

    /// Number of successful credential-list writes
    pub fn replace_count(&self) -> u32 {
        self.replace_count.load(Ordering::SeqCst)
    }

    /// Snapshot of an identity's current credentials
    pub fn credentials_of(&self, id: &IdentityId) -> Option<Vec<PasswordCredential>> {
        self.identities
            .get(id.as_str())
            .map(|entry| entry.credentials.clone())
    }
}

#[async_trait]
impl DirectoryClient for MockDirectory {
    async fn get_identity(
        &self,
        id: &IdentityId,
    ) -> Result<Option<ApplicationIdentity>, DirectoryError> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.identities.get(id.as_str()).map(|entry| entry.clone()))
    }

    async fn replace_credentials(
        &self,
        id: &IdentityId,
        credentials: Vec<PasswordCredential>,
    ) -> Result<(), DirectoryError> {
        if self.forbidden.contains(id.as_str()) {
            return Err(DirectoryError::Forbidden {
                object_id: id.to_string(),
                detail: "mock: credential updates disallowed for this identity".to_string(),
            });
        }

        if self.fail_on_replace.swap(false, Ordering::SeqCst) {
            return Err(DirectoryError::Provider {
                object_id: id.to_string(),
                detail: "mock: injected provider failure".to_string(),
            });
        }

        let Some(mut entry) = self.identities.get_mut(id.as_str()) else {
            return Err(DirectoryError::NotFound {
                object_id: id.to_string(),
            });
        };

        // Native replace semantics, deliberately not a merge
        entry.credentials = credentials;
        self.replace_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// One stored version of a mock vault secret
#[derive(Clone, Debug)]
pub struct SecretVersion {
    /// The version's value
    pub value: SecretValue,
    /// Tags attached at write time
    pub tags: BTreeMap<String, String>,
}

/// Mock vault with versioned secrets and token-driven pagination
///
/// Every write appends a version; reads expose the latest. Listing returns
/// pages of `page_size` records ordered by name, with the continuation
/// token encoding the next start offset.
pub struct MockVault {
    secrets: Arc<DashMap<String, Vec<SecretVersion>>>,
    page_size: usize,
    fail_on_list: Arc<AtomicBool>,
    fail_on_set: Arc<AtomicBool>,
    list_count: Arc<AtomicU32>,
    set_count: Arc<AtomicU32>,
}

impl Default for MockVault {
    fn default() -> Self {
        Self {
            secrets: Arc::new(DashMap::new()),
            page_size: 25,
            fail_on_list: Arc::new(AtomicBool::new(false)),
            fail_on_set: Arc::new(AtomicBool::new(false)),
            list_count: Arc::new(AtomicU32::new(0)),
            set_count: Arc::new(AtomicU32::new(0)),
        }
    }
}

impl MockVault {
    /// Create new mock vault
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size used by `list_secrets`
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = page_size;
        self
    }

    /// Seed a secret directly (out-of-band provisioning)
    pub fn put_secret(&self, name: &str, value: SecretValue, tags: BTreeMap<String, String>) {
        self.secrets
            .entry(name.to_string())
            .or_default()
            .push(SecretVersion { value, tags });
    }

    /// Make the next page fetch fail
    pub fn fail_next_list(&self) {
        self.fail_on_list.store(true, Ordering::SeqCst);
    }

    /// Make the next write fail
    pub fn fail_next_set(&self) {
        self.fail_on_set.store(true, Ordering::SeqCst);
    }

    /// Number of page fetches
    pub fn list_count(&self) -> u32 {
        self.list_count.load(Ordering::SeqCst)
    }

    /// Number of successful writes
    pub fn set_count(&self) -> u32 {
        self.set_count.load(Ordering::SeqCst)
    }

    /// Number of stored versions for a secret
    pub fn version_count(&self, name: &str) -> usize {
        self.secrets.get(name).map_or(0, |entry| entry.len())
    }

    /// Latest version of a secret
    pub fn current(&self, name: &str) -> Option<SecretVersion> {
        self.secrets.get(name).and_then(|entry| entry.last().cloned())
    }
}

#[async_trait]
impl VaultClient for MockVault {
    async fn list_secrets(
        &self,
        _location: &VaultLocation,
        continuation: Option<&str>,
    ) -> Result<SecretPage, VaultError> {
        self.list_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_list.swap(false, Ordering::SeqCst) {
            return Err(VaultError::Request {
                detail: "mock: injected list failure".to_string(),
            });
        }

        let start: usize = match continuation {
            None => 0,
            Some(token) => token.parse().map_err(|_| VaultError::Request {
                detail: format!("mock: malformed continuation token '{token}'"),
            })?,
        };

        let mut names: Vec<String> = self.secrets.iter().map(|e| e.key().clone()).collect();
        names.sort();

        let page_names = names.iter().skip(start).take(self.page_size);
        let secrets = page_names
            .filter_map(|name| {
                self.secrets.get(name).and_then(|versions| {
                    versions.last().map(|current| SecretRecord {
                        name: name.clone(),
                        value: current.value.clone(),
                        tags: current.tags.clone(),
                    })
                })
            })
            .collect();

        let next = start + self.page_size;
        let continuation = (next < names.len()).then(|| next.to_string());

        Ok(SecretPage {
            secrets,
            continuation,
        })
    }

    async fn set_secret(
        &self,
        _location: &VaultLocation,
        name: &str,
        value: &SecretValue,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), VaultError> {
        if self.fail_on_set.swap(false, Ordering::SeqCst) {
            return Err(VaultError::Request {
                detail: "mock: injected set failure".to_string(),
            });
        }

        self.put_secret(name, value.clone(), tags.clone());
        self.set_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::APPLICATION_OBJECT_ID_TAG;

    fn location() -> VaultLocation {
        VaultLocation::parse("https://vault.example.net").unwrap()
    }

    fn tags_for(id: &str) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        tags.insert(APPLICATION_OBJECT_ID_TAG.to_string(), id.to_string());
        tags
    }

    #[tokio::test]
    async fn pagination_walks_every_secret_once() {
        let vault = MockVault::new().with_page_size(2);
        for i in 0..5 {
            vault.put_secret(&format!("sec-{i}"), SecretValue::new("v"), BTreeMap::new());
        }

        let mut seen = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let page = vault
                .list_secrets(&location(), continuation.as_deref())
                .await
                .unwrap();
            seen.extend(page.secrets.into_iter().map(|s| s.name));
            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        assert_eq!(seen, ["sec-0", "sec-1", "sec-2", "sec-3", "sec-4"]);
        assert_eq!(vault.list_count(), 3);
    }

    #[tokio::test]
    async fn malformed_continuation_token_is_rejected() {
        let vault = MockVault::new();
        let err = vault
            .list_secrets(&location(), Some("not-a-number"))
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Request { .. }));
    }

    #[tokio::test]
    async fn writes_append_versions() {
        let vault = MockVault::new();
        vault
            .set_secret(&location(), "sec-1", &SecretValue::new("v1"), &tags_for("app-1"))
            .await
            .unwrap();
        vault
            .set_secret(&location(), "sec-1", &SecretValue::new("v2"), &tags_for("app-1"))
            .await
            .unwrap();

        assert_eq!(vault.version_count("sec-1"), 2);
        let current = vault.current("sec-1").unwrap();
        assert!(current.value.eq_ct(&SecretValue::new("v2")));
        assert_eq!(current.tags, tags_for("app-1"));
    }

    #[tokio::test]
    async fn failure_injection_is_one_shot() {
        let vault = MockVault::new();
        vault.fail_next_list();
        assert!(vault.list_secrets(&location(), None).await.is_err());
        assert!(vault.list_secrets(&location(), None).await.is_ok());
    }
}
