//! Rotation outcomes, per identity and aggregated

use crate::core::error::RotationError;
use std::collections::BTreeMap;
use std::fmt;

/// Why a rotation was skipped rather than performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The vault holds no secret tagged for the identity
    NoSecretForIdentity,
    /// The directory holds no identity under the object id
    IdentityNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSecretForIdentity => write!(f, "no vault secret tagged for identity"),
            SkipReason::IdentityNotFound => write!(f, "identity not found in directory"),
        }
    }
}

/// Terminal outcome of one identity's rotation
#[derive(Debug)]
pub enum RotationOutcome {
    /// New credential registered and new value published to the vault
    Completed {
        /// Vault secret the value was published under
        secret_name: String,
        /// Name of the newly registered credential
        credential_name: String,
    },
    /// Nothing to rotate; neither provider nor vault was touched
    Skipped {
        /// Why the identity was skipped
        reason: SkipReason,
    },
    /// Rotation aborted for this identity
    Failed(RotationError),
}

impl RotationOutcome {
    /// Whether the rotation ran to completion
    pub fn is_completed(&self) -> bool {
        matches!(self, RotationOutcome::Completed { .. })
    }

    /// Whether the rotation found nothing to do
    pub fn is_skipped(&self) -> bool {
        matches!(self, RotationOutcome::Skipped { .. })
    }

    /// Whether the rotation failed
    pub fn is_failed(&self) -> bool {
        matches!(self, RotationOutcome::Failed(_))
    }

    /// The error, when the rotation failed
    pub fn error(&self) -> Option<&RotationError> {
        match self {
            RotationOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for RotationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationOutcome::Completed {
                secret_name,
                credential_name,
            } => write!(
                f,
                "completed: credential '{credential_name}' registered, secret '{secret_name}' updated"
            ),
            RotationOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
            RotationOutcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Aggregate outcome of a bulk rotation, keyed by object id
///
/// Keys are the raw tag values found in the vault, so entries whose tag
/// value is not even a valid object id still show up in the report.
#[derive(Debug, Default)]
pub struct RotationReport {
    outcomes: BTreeMap<String, RotationOutcome>,
}

impl RotationReport {
    /// Record one identity's outcome
    pub fn insert(&mut self, object_id: impl Into<String>, outcome: RotationOutcome) {
        self.outcomes.insert(object_id.into(), outcome);
    }

    /// Outcome for one identity, if it was processed
    pub fn outcome(&self, object_id: &str) -> Option<&RotationOutcome> {
        self.outcomes.get(object_id)
    }

    /// Iterate over all outcomes in object-id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RotationOutcome)> + '_ {
        self.outcomes.iter().map(|(id, o)| (id.as_str(), o))
    }

    /// Number of identities processed
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no identities were processed
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of completed rotations
    pub fn completed(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_completed()).count()
    }

    /// Number of skipped identities
    pub fn skipped(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_skipped()).count()
    }

    /// Number of failed rotations
    pub fn failed(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_failed()).count()
    }
}

impl fmt::Display for RotationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} completed, {} skipped, {} failed",
            self.completed(),
            self.skipped(),
            self.failed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{RotationError, ValidationError};

    fn completed() -> RotationOutcome {
        RotationOutcome::Completed {
            secret_name: "sec-1".to_string(),
            credential_name: "RotatedKey2".to_string(),
        }
    }

    #[test]
    fn outcome_predicates() {
        assert!(completed().is_completed());
        assert!(
            RotationOutcome::Skipped {
                reason: SkipReason::NoSecretForIdentity
            }
            .is_skipped()
        );
        let failed = RotationOutcome::Failed(ValidationError::EmptyIdentityId.into());
        assert!(failed.is_failed());
        assert!(failed.error().is_some());
    }

    #[test]
    fn report_counts_and_summary() {
        let mut report = RotationReport::default();
        report.insert("app-a", completed());
        report.insert(
            "app-b",
            RotationOutcome::Skipped {
                reason: SkipReason::IdentityNotFound,
            },
        );
        report.insert(
            "app-c",
            RotationOutcome::Failed(RotationError::AmbiguousOwnership {
                object_id: "app-c".to_string(),
                secret_names: vec!["x".to_string(), "y".to_string()],
            }),
        );

        assert_eq!(report.len(), 3);
        assert_eq!(report.completed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.to_string(), "1 completed, 1 skipped, 1 failed");
        assert!(report.outcome("app-a").unwrap().is_completed());
        assert!(report.outcome("app-z").is_none());
    }

    #[test]
    fn report_iterates_in_object_id_order() {
        let mut report = RotationReport::default();
        report.insert("b", completed());
        report.insert("a", completed());
        let ids: Vec<&str> = report.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
