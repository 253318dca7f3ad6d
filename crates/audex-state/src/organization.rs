//! # Organization Lifecycle State Machine
//!
//! Models the lifecycle of customer organizations on the platform.
//!
//! ## States
//!
//! ```text
//! Pending ──▶ Active ⇄ Paused
//!    │          │         │
//!    │          ├──▶ Disabled ──▶ Active (re-enable)
//!    │          │         │
//!    └──▶ Disabled        │
//!               │         │
//!               └──▶ Archived (terminal) ◀──┘
//! ```
//!
//! An organization is never hard-deleted in normal operation; `Archived`
//! is the terminal resting state. `Disabled` is an administrative hold
//! that can be lifted, `Paused` is a customer-initiated hold.

use serde::{Deserialize, Serialize};

use audex_core::StateTransitionError;

/// The lifecycle status of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgStatus {
    /// Created but not yet activated.
    Pending,
    /// Fully operational.
    Active,
    /// Temporarily paused at the customer's request.
    Paused,
    /// Administratively disabled.
    Disabled,
    /// Permanently archived (terminal).
    Archived,
}

impl OrgStatus {
    /// The canonical lowercase status name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Disabled => "disabled",
            Self::Archived => "archived",
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Whether `to` is a legal next status from `self`.
    pub fn can_transition_to(&self, to: OrgStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Active)
                | (Self::Pending, Self::Disabled)
                | (Self::Active, Self::Paused)
                | (Self::Active, Self::Disabled)
                | (Self::Active, Self::Archived)
                | (Self::Paused, Self::Active)
                | (Self::Paused, Self::Disabled)
                | (Self::Paused, Self::Archived)
                | (Self::Disabled, Self::Active)
                | (Self::Disabled, Self::Archived)
        )
    }

    /// Validate a transition, returning an error naming the attempted
    /// move if it is not on the legal graph.
    pub fn try_transition(&self, to: OrgStatus) -> Result<OrgStatus, StateTransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StateTransitionError::new("organization", self, to))
        }
    }
}

impl std::fmt::Display for OrgStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
