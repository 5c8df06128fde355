//! Core types for credential rotation
mod config;
mod error;
mod identity;
mod outcome;
mod secret;
mod state;

pub use config::RotatorConfig;
pub use error::{DirectoryError, Result, RotationError, ValidationError, VaultError};
pub use identity::{ApplicationIdentity, IdentityId, PasswordCredential};
pub use outcome::{RotationOutcome, RotationReport, SkipReason};
pub use secret::{APPLICATION_OBJECT_ID_TAG, SecretRecord, SecretValue, VaultLocation};
pub use state::RotationState;
