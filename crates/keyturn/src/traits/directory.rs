//! Identity provider seam

use crate::core::{ApplicationIdentity, DirectoryError, IdentityId, PasswordCredential};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Client for the directory holding application identities
///
/// Implementations must be `Send + Sync` so they can be shared as
/// `Arc<dyn DirectoryClient>` across async tasks.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Fetch an identity by object id
    ///
    /// Returns `Ok(None)` when no identity is registered under the id.
    async fn get_identity(
        &self,
        id: &IdentityId,
    ) -> Result<Option<ApplicationIdentity>, DirectoryError>;

    /// Names of all credentials currently registered on an identity
    ///
    /// Returns `Ok(None)` when the identity does not exist. The default
    /// implementation reads the full identity; implementations backed by a
    /// provider with a cheaper listing call can override it.
    async fn list_credential_names(
        &self,
        id: &IdentityId,
    ) -> Result<Option<BTreeSet<String>>, DirectoryError> {
        Ok(self
            .get_identity(id)
            .await?
            .map(|identity| identity.credential_names()))
    }

    /// Replace the identity's full credential list
    ///
    /// These are the native update semantics of the modeled providers: the
    /// submitted list REPLACES whatever is currently registered, with no
    /// merging. Callers that mean to add a credential must read the current
    /// list first and submit `current ∪ {new}`; that read-merge-write
    /// contract lives in [`CredentialProvisioner`], never here.
    ///
    /// [`CredentialProvisioner`]: crate::provisioner::CredentialProvisioner
    async fn replace_credentials(
        &self,
        id: &IdentityId,
        credentials: Vec<PasswordCredential>,
    ) -> Result<(), DirectoryError>;
}
