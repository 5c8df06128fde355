//! Error types for rotation operations
//!
//! Two leaf enums mirror the two collaborators: [`DirectoryError`] for the
//! identity provider and [`VaultError`] for the secret vault. Both convert
//! into the top-level [`RotationError`], which adds the failure modes the
//! engine itself can produce (ambiguous ownership, validation, invalid
//! state transitions).
//!
//! Every error is scoped to a single identity's rotation; bulk rotation
//! never lets one identity's failure abort the others.

use crate::core::state::RotationState;
use thiserror::Error;

/// Errors returned by the identity provider
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No application identity registered under the given object id
    #[error("no application identity found for object id '{object_id}'")]
    NotFound {
        /// Directory object id
        object_id: String,
    },

    /// The caller lacks permission to read or modify the identity
    #[error("forbidden to modify application identity '{object_id}'")]
    Forbidden {
        /// Directory object id
        object_id: String,
        /// Provider response payload, logged for diagnosis
        detail: String,
    },

    /// Any other provider failure, carrying the provider's diagnostic payload
    #[error("directory request for '{object_id}' failed: {detail}")]
    Provider {
        /// Directory object id
        object_id: String,
        /// Provider response payload
        detail: String,
    },
}

impl DirectoryError {
    /// Whether this is a permission failure
    pub fn is_forbidden(&self) -> bool {
        matches!(self, DirectoryError::Forbidden { .. })
    }
}

/// Errors returned by the secret vault
#[derive(Debug, Error)]
pub enum VaultError {
    /// The request never produced a response
    #[error("vault request failed: {detail}")]
    Request {
        /// Transport-level failure description
        detail: String,
    },

    /// The vault rejected the request
    #[error("vault returned status {status}: {detail}")]
    Response {
        /// HTTP-like status code
        status: u16,
        /// Vault response payload
        detail: String,
    },
}

/// Validation errors for identifiers and configuration
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Identity object id cannot be empty
    #[error("identity object id cannot be empty")]
    EmptyIdentityId,

    /// Identity object id is malformed
    #[error("invalid identity object id '{id}': {reason}")]
    InvalidIdentityId {
        /// The invalid id
        id: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A configuration field failed validation
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidConfig {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The credential name is already taken on the identity
    ///
    /// The allocator never hands out a taken name; this surfaces only when a
    /// concurrent actor claims the name between allocation and the
    /// provisioner's fresh read. Re-invoking the rotation allocates the next
    /// free suffix.
    #[error("credential name '{name}' already exists on identity '{object_id}'")]
    DuplicateCredentialName {
        /// Directory object id
        object_id: String,
        /// The contested credential name
        name: String,
    },
}

/// Top-level rotation error
#[derive(Debug, Error)]
pub enum RotationError {
    /// Identity provider failure during rotation
    #[error("directory operation failed for identity '{object_id}'")]
    Directory {
        /// Directory object id
        object_id: String,
        /// Underlying provider error
        #[source]
        source: DirectoryError,
    },

    /// Vault failure during discovery or persistence
    #[error("vault operation failed")]
    Vault {
        /// Underlying vault error
        #[source]
        source: VaultError,
    },

    /// More than one vault secret claims the same identity
    ///
    /// Never auto-resolved: the engine aborts this identity's rotation and
    /// leaves both provider and vault untouched.
    #[error("identity '{object_id}' is claimed by {} vault secrets: {secret_names:?}", secret_names.len())]
    AmbiguousOwnership {
        /// Directory object id
        object_id: String,
        /// Names of all secrets carrying the identity's tag
        secret_names: Vec<String>,
    },

    /// Identifier or configuration validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal state machine violation
    #[error("invalid rotation state transition {from} -> {to}")]
    InvalidStateTransition {
        /// State the rotation was in
        from: RotationState,
        /// State the transition targeted
        to: RotationState,
    },
}

impl RotationError {
    /// Wrap a provider error with the identity it concerns
    pub fn directory(object_id: impl Into<String>, source: DirectoryError) -> Self {
        Self::Directory {
            object_id: object_id.into(),
            source,
        }
    }

    /// Whether the failure was a permission denial by the provider
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            RotationError::Directory {
                source: DirectoryError::Forbidden { .. },
                ..
            }
        )
    }

    /// Whether the failure originated in the vault
    pub fn is_vault(&self) -> bool {
        matches!(self, RotationError::Vault { .. })
    }
}

impl From<VaultError> for RotationError {
    fn from(source: VaultError) -> Self {
        Self::Vault { source }
    }
}

/// Result type alias for rotation operations
pub type Result<T> = std::result::Result<T, RotationError>;
