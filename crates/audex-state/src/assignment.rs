//! Role-assignment status machine.
//!
//! Expiry is passive: read paths treat an assignment with a past
//! `expires_at` as inactive regardless of this status, so `Expired` is
//! only ever recorded opportunistically.

use serde::{Deserialize, Serialize};

use audex_core::StateTransitionError;

/// The status of a role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Assignment is in force.
    Active,
    /// Temporarily suspended by an administrator.
    Suspended,
    /// Past its expiry (terminal).
    Expired,
}

impl AssignmentStatus {
    /// The canonical lowercase status name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Expired => "expired",
        }
    }

    /// Whether `to` is a legal next status from `self`.
    pub fn can_transition_to(&self, to: AssignmentStatus) -> bool {
        matches!(
            (self, to),
            (Self::Active, Self::Suspended)
                | (Self::Active, Self::Expired)
                | (Self::Suspended, Self::Active)
                | (Self::Suspended, Self::Expired)
        )
    }

    /// Validate a transition against the legal graph.
    pub fn try_transition(
        &self,
        to: AssignmentStatus,
    ) -> Result<AssignmentStatus, StateTransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StateTransitionError::new("role assignment", self, to))
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspend_and_reinstate() {
        let s = AssignmentStatus::Active
            .try_transition(AssignmentStatus::Suspended)
            .unwrap();
        assert_eq!(
            s.try_transition(AssignmentStatus::Active).unwrap(),
            AssignmentStatus::Active
        );
    }

    #[test]
    fn test_expired_is_terminal() {
        for to in [
            AssignmentStatus::Active,
            AssignmentStatus::Suspended,
            AssignmentStatus::Expired,
        ] {
            assert!(!AssignmentStatus::Expired.can_transition_to(to));
        }
    }
}
