//! Builder for [`RotationEngine`]

use crate::catalog::SecretCatalog;
use crate::core::{RotatorConfig, ValidationError};
use crate::engine::RotationEngine;
use crate::persister::SecretPersister;
use crate::provisioner::CredentialProvisioner;
use crate::traits::{DirectoryClient, VaultClient};
use std::sync::Arc;

/// Builder for [`RotationEngine`]
///
/// Both collaborators and the configuration are required; [`build`]
/// validates the configuration before assembling the engine.
///
/// [`build`]: EngineBuilder::build
#[derive(Default)]
pub struct EngineBuilder {
    directory: Option<Arc<dyn DirectoryClient>>,
    vault: Option<Arc<dyn VaultClient>>,
    config: Option<RotatorConfig>,
}

impl EngineBuilder {
    /// Create new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity provider client
    pub fn directory(mut self, directory: Arc<dyn DirectoryClient>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Set the vault client
    pub fn vault(mut self, vault: Arc<dyn VaultClient>) -> Self {
        self.vault = Some(vault);
        self
    }

    /// Set the engine configuration
    pub fn config(mut self, config: RotatorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<RotationEngine, ValidationError> {
        let directory = self.directory.ok_or_else(|| required("directory"))?;
        let vault = self.vault.ok_or_else(|| required("vault"))?;
        let config = self.config.ok_or_else(|| required("config"))?;
        config.validate()?;

        let catalog = SecretCatalog::new(vault.clone(), config.vault_location.clone());
        let provisioner = CredentialProvisioner::new(directory.clone());
        let persister = SecretPersister::new(vault, config.vault_location.clone());

        Ok(RotationEngine::assemble(
            directory,
            catalog,
            provisioner,
            persister,
            config,
        ))
    }
}

fn required(field: &str) -> ValidationError {
    ValidationError::InvalidConfig {
        field: field.to_string(),
        reason: "is required to build a RotationEngine".to_string(),
    }
}
