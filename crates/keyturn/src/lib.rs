//! Keyturn
//!
//! Rotates password credentials for directory-registered application
//! identities and republishes the rotated value to a secret vault, so that
//! dependent services can pick up a fresh secret without manual steps.
//!
//! The crate is the rotation core only. It talks to its two collaborators
//! through async trait seams:
//!
//! - [`traits::DirectoryClient`]: the identity provider holding the
//!   application identities and their password credentials
//! - [`traits::VaultClient`]: the secret vault holding the published values
//!
//! Triggering (HTTP, cron), authentication bootstrap and subscriber setup
//! for `tracing` are the embedding process's concern.
//!
//! # Example
//!
//! ```no_run
//! use keyturn::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(directory: Arc<dyn DirectoryClient>, vault: Arc<dyn VaultClient>)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let config = RotatorConfig::new(VaultLocation::parse("https://vault.example.net")?);
//! let engine = RotationEngine::builder()
//!     .directory(directory)
//!     .vault(vault)
//!     .config(config)
//!     .build()?;
//!
//! let id = IdentityId::new("00000000-1111-2222-3333-444444444444")?;
//! let outcome = engine.rotate(&id).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Credential name allocation
pub mod allocator;
/// Paginated vault enumeration
pub mod catalog;
/// Core types, errors and configuration
pub mod core;
/// Rotation orchestration
pub mod engine;
/// Secret value generation
pub mod generator;
/// Secret-to-identity tag matching
pub mod matcher;
/// Vault write-back of rotated values
pub mod persister;
/// Additive credential provisioning
pub mod provisioner;
/// Test doubles for the collaborator seams
pub mod testing;
/// Collaborator trait seams
pub mod traits;

/// Commonly used types and traits
pub mod prelude {
    pub use crate::core::{
        ApplicationIdentity, DirectoryError, IdentityId, PasswordCredential, RotatorConfig,
        RotationError, RotationOutcome, RotationReport, SecretRecord, SecretValue, SkipReason,
        VaultError, VaultLocation,
    };
    pub use crate::engine::{EngineBuilder, RotationEngine};
    pub use crate::traits::{DirectoryClient, SecretPage, VaultClient};
    pub use async_trait::async_trait;
}

// Re-export commonly used external types
pub use chrono::{DateTime, Utc};
