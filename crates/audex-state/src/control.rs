//! # Control-Profile Workflow State Machine
//!
//! The evidence-collection workflow for one control within one
//! engagement.
//!
//! ```text
//! Open ──▶ Responded ──▶ UnderReview ──▶ Complete (terminal)
//!  │           ▲              │              ▲
//!  │           │              ▼              │
//!  │           └──── ActionRequired ─────────┤
//!  └─────────────────────────────────────────┘
//! ```
//!
//! `Complete` is reachable directly from every state — an auditor may
//! mark a control not-applicable or accept evidence without a review
//! round trip. Once complete, a control never reopens; a new engagement
//! produces a fresh profile referencing the prior submission.

use serde::{Deserialize, Serialize};

use audex_core::StateTransitionError;

/// The workflow status of an engagement control profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    /// Awaiting the customer's response.
    Open,
    /// Evidence submitted, awaiting review.
    Responded,
    /// Auditor review in progress.
    UnderReview,
    /// Review found gaps; customer action needed.
    ActionRequired,
    /// Assessment finished (terminal).
    Complete,
}

impl ControlStatus {
    /// The canonical lowercase status name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Responded => "responded",
            Self::UnderReview => "under_review",
            Self::ActionRequired => "action_required",
            Self::Complete => "complete",
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Whether `to` is a legal next status from `self`.
    pub fn can_transition_to(&self, to: ControlStatus) -> bool {
        matches!(
            (self, to),
            (Self::Open, Self::Responded)
                | (Self::Open, Self::Complete)
                | (Self::Responded, Self::UnderReview)
                | (Self::Responded, Self::ActionRequired)
                | (Self::Responded, Self::Complete)
                | (Self::UnderReview, Self::ActionRequired)
                | (Self::UnderReview, Self::Complete)
                | (Self::ActionRequired, Self::Responded)
                | (Self::ActionRequired, Self::Complete)
        )
    }

    /// Validate a transition against the legal graph.
    pub fn try_transition(
        &self,
        to: ControlStatus,
    ) -> Result<ControlStatus, StateTransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StateTransitionError::new("control profile", self, to))
        }
    }
}

impl std::fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
