//! Additive credential provisioning against the identity provider

use crate::core::{
    ApplicationIdentity, DirectoryError, IdentityId, PasswordCredential, Result, RotationError,
    SecretValue, ValidationError,
};
use crate::traits::DirectoryClient;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Registers new credentials without disturbing existing ones
///
/// The directory's native update REPLACES the full credential list, so the
/// provisioner re-reads the identity's current state immediately before
/// merging and submits `current ∪ {new}`. The fresh read is what makes the
/// operation tolerate concurrent external modification without a lock: any
/// credential added by another actor since the engine's earlier name read is
/// present in the merged list and survives the write.
pub struct CredentialProvisioner {
    directory: Arc<dyn DirectoryClient>,
}

impl CredentialProvisioner {
    /// Create a provisioner over the given directory
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self { directory }
    }

    /// Add one credential to an identity, preserving all existing ones
    ///
    /// Returns the identity as it looks after the write. Fails without
    /// writing when the identity has vanished or when the name is already
    /// taken; additivity always wins over overwriting.
    pub async fn add_credential(
        &self,
        id: &IdentityId,
        name: &str,
        value: SecretValue,
        valid_from: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<ApplicationIdentity> {
        debug!(object_id = %id, credential = %name, "reading current credential list before merge");

        let identity = self
            .directory
            .get_identity(id)
            .await
            .map_err(|e| RotationError::directory(id.as_str(), e))?
            .ok_or_else(|| {
                RotationError::directory(
                    id.as_str(),
                    DirectoryError::NotFound {
                        object_id: id.to_string(),
                    },
                )
            })?;

        if identity.has_credential(name) {
            return Err(ValidationError::DuplicateCredentialName {
                object_id: id.to_string(),
                name: name.to_string(),
            }
            .into());
        }

        let mut credentials = identity.credentials.clone();
        credentials.push(PasswordCredential {
            name: name.to_string(),
            value,
            valid_from,
            lifetime,
        });

        if let Err(err) = self
            .directory
            .replace_credentials(id, credentials.clone())
            .await
        {
            match &err {
                DirectoryError::Forbidden { detail, .. } => {
                    error!(object_id = %id, "forbidden to add credential to application identity");
                    debug!(object_id = %id, detail = %detail, "provider response for forbidden update");
                }
                other => error!(object_id = %id, error = %other, "credential update failed"),
            }
            return Err(RotationError::directory(id.as_str(), err));
        }

        info!(
            object_id = %id,
            credential = %name,
            valid_from = %valid_from,
            lifetime = ?lifetime,
            "added new credential to application identity"
        );

        Ok(ApplicationIdentity {
            credentials,
            ..identity
        })
    }
}
