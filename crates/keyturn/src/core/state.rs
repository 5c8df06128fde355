//! Rotation state machine
//!
//! Tracks one `rotate` invocation from discovery through persistence.

use crate::core::error::{Result, RotationError};
use serde::{Deserialize, Serialize};

/// State of a single rotation invocation
///
/// # State Transitions
///
/// ```text
/// Idle → Discovering → {Skipped | Found} → Generating → Naming
///      → Provisioning → {Failed | Provisioned} → Persisting → {Failed | Completed}
/// ```
///
/// Discovery can also fail directly (vault enumeration error, ambiguous
/// ownership). `Skipped`, `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationState {
    /// Nothing started yet
    Idle,

    /// Enumerating the vault and resolving the owning secret and identity
    Discovering,

    /// No secret (or no identity) to rotate; nothing was mutated
    Skipped,

    /// Exactly one owning secret resolved
    Found,

    /// Generating the new secret value
    Generating,

    /// Allocating a collision-free credential name
    Naming,

    /// Registering the new credential with the identity provider
    Provisioning,

    /// Credential registered; vault not yet updated
    Provisioned,

    /// Writing the new value back to the vault
    Persisting,

    /// Credential registered and vault updated
    Completed,

    /// Rotation aborted for this identity
    Failed,
}

impl RotationState {
    /// Check if transition to the target state is valid
    #[must_use]
    pub fn can_transition_to(&self, target: RotationState) -> bool {
        use RotationState::*;

        match (self, target) {
            // Forward progress
            (Idle, Discovering) => true,
            (Discovering, Found) => true,
            (Found, Generating) => true,
            (Generating, Naming) => true,
            (Naming, Provisioning) => true,
            (Provisioning, Provisioned) => true,
            (Provisioned, Persisting) => true,
            (Persisting, Completed) => true,

            // Nothing to rotate
            (Discovering, Skipped) => true,

            // Failure edges on the fallible phases
            (Discovering, Failed) => true,
            (Provisioning, Failed) => true,
            (Persisting, Failed) => true,

            // Terminal states cannot transition
            (Skipped | Completed | Failed, _) => false,

            // All other transitions are invalid
            _ => false,
        }
    }

    /// Validate and perform state transition
    pub fn transition_to(&self, target: RotationState) -> Result<RotationState> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(RotationError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if state is terminal (no more transitions possible)
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RotationState::Skipped | RotationState::Completed | RotationState::Failed
        )
    }
}

impl std::fmt::Display for RotationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RotationState::Idle => "idle",
            RotationState::Discovering => "discovering",
            RotationState::Skipped => "skipped",
            RotationState::Found => "found",
            RotationState::Generating => "generating",
            RotationState::Naming => "naming",
            RotationState::Provisioning => "provisioning",
            RotationState::Provisioned => "provisioned",
            RotationState::Persisting => "persisting",
            RotationState::Completed => "completed",
            RotationState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let path = [
            RotationState::Idle,
            RotationState::Discovering,
            RotationState::Found,
            RotationState::Generating,
            RotationState::Naming,
            RotationState::Provisioning,
            RotationState::Provisioned,
            RotationState::Persisting,
            RotationState::Completed,
        ];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be valid",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn skip_and_failure_edges() {
        assert!(RotationState::Discovering.can_transition_to(RotationState::Skipped));
        assert!(RotationState::Discovering.can_transition_to(RotationState::Failed));
        assert!(RotationState::Provisioning.can_transition_to(RotationState::Failed));
        assert!(RotationState::Persisting.can_transition_to(RotationState::Failed));

        // Pure in-memory phases have no failure edge
        assert!(!RotationState::Generating.can_transition_to(RotationState::Failed));
        assert!(!RotationState::Naming.can_transition_to(RotationState::Failed));
    }

    #[test]
    fn invalid_transitions() {
        // Cannot skip states
        assert!(!RotationState::Idle.can_transition_to(RotationState::Provisioning));
        assert!(!RotationState::Found.can_transition_to(RotationState::Persisting));

        // Terminal states cannot transition
        assert!(!RotationState::Completed.can_transition_to(RotationState::Idle));
        assert!(!RotationState::Failed.can_transition_to(RotationState::Discovering));
        assert!(!RotationState::Skipped.can_transition_to(RotationState::Found));
    }

    #[test]
    fn terminal_states() {
        assert!(RotationState::Skipped.is_terminal());
        assert!(RotationState::Completed.is_terminal());
        assert!(RotationState::Failed.is_terminal());
        assert!(!RotationState::Provisioned.is_terminal());
    }

    #[test]
    fn transition_validation() {
        let next = RotationState::Idle.transition_to(RotationState::Discovering);
        assert_eq!(next.unwrap(), RotationState::Discovering);

        let invalid = RotationState::Idle.transition_to(RotationState::Completed);
        assert!(matches!(
            invalid,
            Err(RotationError::InvalidStateTransition { .. })
        ));
    }
}
