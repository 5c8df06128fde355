//! The rotation engine

use crate::allocator;
use crate::catalog::SecretCatalog;
use crate::core::{
    IdentityId, Result, RotationError, RotationOutcome, RotationReport, RotationState,
    RotatorConfig, SkipReason,
};
use crate::engine::EngineBuilder;
use crate::generator;
use crate::matcher;
use crate::persister::SecretPersister;
use crate::provisioner::CredentialProvisioner;
use crate::traits::DirectoryClient;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, trace, warn};

/// Orchestrates credential rotation for application identities
///
/// One [`rotate`](RotationEngine::rotate) call walks a single identity
/// through discover → generate → name → provision → persist. Provisioning
/// on the identity provider always happens before the vault write: if only
/// one of the two succeeds, the surviving state is "new credential valid,
/// old secret value still published", which a later re-invocation resolves.
/// The reverse order could publish a value no credential accepts and lock
/// consumers out.
///
/// [`rotate_all`](RotationEngine::rotate_all) applies the same path to
/// every identity claimed by a tagged vault secret, sequentially (bounding
/// load on the identity provider and keeping per-identity operations
/// ordered), and isolates failures per identity.
pub struct RotationEngine {
    directory: Arc<dyn DirectoryClient>,
    catalog: SecretCatalog,
    provisioner: CredentialProvisioner,
    persister: SecretPersister,
    config: RotatorConfig,
}

impl std::fmt::Debug for RotationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RotationEngine {
    pub(crate) fn assemble(
        directory: Arc<dyn DirectoryClient>,
        catalog: SecretCatalog,
        provisioner: CredentialProvisioner,
        persister: SecretPersister,
        config: RotatorConfig,
    ) -> Self {
        Self {
            directory,
            catalog,
            provisioner,
            persister,
            config,
        }
    }

    /// Create builder for constructing an engine instance
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// The engine's configuration
    pub fn config(&self) -> &RotatorConfig {
        &self.config
    }

    /// Rotate one identity's credential
    ///
    /// Errors terminate only this identity's rotation and are folded into
    /// the outcome; the engine performs no automatic retries. Re-invoking
    /// after a partial failure is safe: the allocator picks the next free
    /// suffix and persistence is attempted again.
    pub async fn rotate(&self, id: &IdentityId) -> RotationOutcome {
        match self.try_rotate(id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(object_id = %id, error = %err, "rotation failed");
                RotationOutcome::Failed(err)
            }
        }
    }

    async fn try_rotate(&self, id: &IdentityId) -> Result<RotationOutcome> {
        let mut state = RotationState::Idle;
        self.advance(&mut state, RotationState::Discovering)?;

        let secrets = self.catalog.list_all().await?;
        let Some(secret) = matcher::find_by_identity(id, &secrets)? else {
            self.advance(&mut state, RotationState::Skipped)?;
            warn!(
                object_id = %id,
                "no vault secret belongs to this identity; rotation skipped. Add a tagged secret to the vault to enable rotation"
            );
            return Ok(RotationOutcome::Skipped {
                reason: SkipReason::NoSecretForIdentity,
            });
        };

        let existing_names = self
            .directory
            .list_credential_names(id)
            .await
            .map_err(|e| RotationError::directory(id.as_str(), e))?;
        let Some(existing_names) = existing_names else {
            self.advance(&mut state, RotationState::Skipped)?;
            info!(object_id = %id, "no application identity found; rotation skipped");
            return Ok(RotationOutcome::Skipped {
                reason: SkipReason::IdentityNotFound,
            });
        };
        self.advance(&mut state, RotationState::Found)?;

        self.advance(&mut state, RotationState::Generating)?;
        let value = generator::generate_secret_value();

        self.advance(&mut state, RotationState::Naming)?;
        let credential_name = allocator::allocate_name(&existing_names, &self.config.key_name_base);

        self.advance(&mut state, RotationState::Provisioning)?;
        self.provisioner
            .add_credential(
                id,
                &credential_name,
                value.clone(),
                Utc::now(),
                self.config.credential_lifetime,
            )
            .await?;
        self.advance(&mut state, RotationState::Provisioned)?;

        self.advance(&mut state, RotationState::Persisting)?;
        self.persister
            .persist(&secret.name, &value, &secret.tags)
            .await?;
        self.advance(&mut state, RotationState::Completed)?;

        info!(
            object_id = %id,
            credential = %credential_name,
            secret = %secret.name,
            "rotation completed"
        );
        Ok(RotationOutcome::Completed {
            secret_name: secret.name.clone(),
            credential_name,
        })
    }

    /// Rotate every identity claimed by a tagged vault secret
    ///
    /// Enumerates the vault once to find the identities, then runs the full
    /// single-identity path for each. One identity's failure never prevents
    /// processing of the rest; the initial enumeration itself is the only
    /// failure that aborts the bulk run, because without it there is no
    /// identity list to work from.
    pub async fn rotate_all(&self) -> Result<RotationReport> {
        let secrets = self.catalog.list_all().await?;
        let object_ids = matcher::tagged_identity_ids(&secrets);
        info!(
            identities = object_ids.len(),
            "starting bulk rotation over tagged secrets"
        );

        let mut report = RotationReport::default();
        for raw in object_ids {
            match IdentityId::new(raw.clone()) {
                Ok(id) => {
                    let outcome = self.rotate(&id).await;
                    report.insert(raw, outcome);
                }
                Err(err) => {
                    error!(object_id = %raw, error = %err, "tag value is not a usable object id");
                    report.insert(raw, RotationOutcome::Failed(err.into()));
                }
            }
        }

        info!(summary = %report, "bulk rotation finished");
        Ok(report)
    }

    fn advance(&self, state: &mut RotationState, to: RotationState) -> Result<()> {
        *state = state.transition_to(to)?;
        trace!(state = %state, "rotation state advanced");
        Ok(())
    }
}
