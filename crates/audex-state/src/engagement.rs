//! # Engagement Status & Stage Machines
//!
//! An engagement carries two independent progressions:
//!
//! - **Status** is the scheduling lifecycle. Every non-terminal status may
//!   close early; `Closed` is terminal.
//!
//! ```text
//! Pending ──▶ Scheduled ──▶ Active ──▶ Extended ──▶ Closed
//!    │             │           │                       ▲
//!    └─────────────┴───────────┴───────────────────────┘
//! ```
//!
//! - **Stage** is the fieldwork progression. It is an ordered sequence
//!   that may only move forward or stay put — there is no going back to
//!   onboarding once fieldwork has begun.

use serde::{Deserialize, Serialize};

use audex_core::StateTransitionError;

/// The scheduling status of an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    /// Agreed but not yet scheduled.
    Pending,
    /// Scheduled with a confirmed timeline.
    Scheduled,
    /// Fieldwork underway.
    Active,
    /// Running past the original timeline.
    Extended,
    /// Finished or cancelled (terminal).
    Closed,
}

impl EngagementStatus {
    /// The canonical lowercase status name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Extended => "extended",
            Self::Closed => "closed",
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether `to` is a legal next status from `self`.
    pub fn can_transition_to(&self, to: EngagementStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Scheduled)
                | (Self::Pending, Self::Closed)
                | (Self::Scheduled, Self::Active)
                | (Self::Scheduled, Self::Closed)
                | (Self::Active, Self::Extended)
                | (Self::Active, Self::Closed)
                | (Self::Extended, Self::Closed)
        )
    }

    /// Validate a transition against the legal graph.
    pub fn try_transition(
        &self,
        to: EngagementStatus,
    ) -> Result<EngagementStatus, StateTransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StateTransitionError::new("engagement", self, to))
        }
    }
}

impl std::fmt::Display for EngagementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The fieldwork stage of an engagement. Ordered; may only advance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EngagementStage {
    /// Kickoff, access provisioning, scoping.
    Onboarding = 0,
    /// Evidence collection and testing.
    Fieldwork = 1,
    /// Drafting the deliverable.
    DeliverableCreation = 2,
    /// Internal and customer review of the deliverable.
    DeliverableReview = 3,
    /// Final sign-off and handover.
    WrapUp = 4,
}

impl EngagementStage {
    /// Position in the ordered sequence (0-based).
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// The canonical lowercase stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Fieldwork => "fieldwork",
            Self::DeliverableCreation => "deliverable_creation",
            Self::DeliverableReview => "deliverable_review",
            Self::WrapUp => "wrap_up",
        }
    }

    /// Whether moving to `to` is allowed: forward or stay, never back.
    pub fn can_advance_to(&self, to: EngagementStage) -> bool {
        to.index() >= self.index()
    }

    /// Validate a stage move. Staying on the current stage is allowed.
    pub fn try_advance(
        &self,
        to: EngagementStage,
    ) -> Result<EngagementStage, StateTransitionError> {
        if self.can_advance_to(to) {
            Ok(to)
        } else {
            Err(StateTransitionError::new("engagement stage", self, to))
        }
    }
}

impl std::fmt::Display for EngagementStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_STATUSES: [EngagementStatus; 5] = [
        EngagementStatus::Pending,
        EngagementStatus::Scheduled,
        EngagementStatus::Active,
        EngagementStatus::Extended,
        EngagementStatus::Closed,
    ];

    const ALL_STAGES: [EngagementStage; 5] = [
        EngagementStage::Onboarding,
        EngagementStage::Fieldwork,
        EngagementStage::DeliverableCreation,
        EngagementStage::DeliverableReview,
        EngagementStage::WrapUp,
    ];

    #[test]
    fn test_happy_path() {
        let mut status = EngagementStatus::Pending;
        for next in [
            EngagementStatus::Scheduled,
            EngagementStatus::Active,
            EngagementStatus::Extended,
            EngagementStatus::Closed,
        ] {
            status = status.try_transition(next).unwrap();
        }
        assert!(status.is_terminal());
    }

    #[test]
    fn test_every_open_status_can_close() {
        for status in ALL_STATUSES {
            if !status.is_terminal() {
                assert!(status.can_transition_to(EngagementStatus::Closed));
            }
        }
    }

    #[test]
    fn test_active_cannot_return_to_pending() {
        let err = EngagementStatus::Active
            .try_transition(EngagementStatus::Pending)
            .unwrap_err();
        assert_eq!(err.from, "active");
        assert_eq!(err.to, "pending");
    }

    #[test]
    fn test_closed_is_terminal() {
        for to in ALL_STATUSES {
            assert!(!EngagementStatus::Closed.can_transition_to(to));
        }
    }

    #[test]
    fn test_stage_forward_or_stay() {
        assert!(EngagementStage::Onboarding.can_advance_to(EngagementStage::Fieldwork));
        assert!(EngagementStage::Fieldwork.can_advance_to(EngagementStage::Fieldwork));
        assert!(EngagementStage::Fieldwork.can_advance_to(EngagementStage::WrapUp));
        assert!(!EngagementStage::Fieldwork.can_advance_to(EngagementStage::Onboarding));
        assert!(!EngagementStage::WrapUp.can_advance_to(EngagementStage::DeliverableReview));
    }

    #[test]
    fn test_stage_ordering_matches_index() {
        for pair in ALL_STAGES.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].index() + 1, pair[1].index());
        }
    }

    proptest! {
        /// Any accepted stage move leaves the index non-decreasing, so a
        /// chain of accepted moves can never take the stage backwards.
        #[test]
        fn prop_accepted_stage_moves_never_decrease(
            from in 0usize..5,
            to in 0usize..5,
        ) {
            let from = ALL_STAGES[from];
            let to = ALL_STAGES[to];
            match from.try_advance(to) {
                Ok(next) => prop_assert!(next.index() >= from.index()),
                Err(_) => prop_assert!(to.index() < from.index()),
            }
        }

        /// The status graph admits no move out of a terminal state.
        #[test]
        fn prop_terminal_status_admits_nothing(to in 0usize..5) {
            prop_assert!(!EngagementStatus::Closed.can_transition_to(ALL_STATUSES[to]));
        }
    }
}
