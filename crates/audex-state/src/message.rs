//! Message lifecycle machine.
//!
//! Messages are soft-deleted: `Deleted` is terminal and the record is
//! kept for the audit trail.

use serde::{Deserialize, Serialize};

use audex_core::StateTransitionError;

/// The lifecycle of an engagement or control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLifecycle {
    /// Composed but not yet visible to other participants.
    Draft,
    /// Delivered to the engagement.
    Sent,
    /// Seen by at least one recipient.
    Read,
    /// Soft-deleted (terminal).
    Deleted,
}

impl MessageLifecycle {
    /// The canonical lowercase state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Read => "read",
            Self::Deleted => "deleted",
        }
    }

    /// Whether `to` is a legal next state from `self`.
    pub fn can_transition_to(&self, to: MessageLifecycle) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Sent)
                | (Self::Draft, Self::Deleted)
                | (Self::Sent, Self::Read)
                | (Self::Sent, Self::Deleted)
                | (Self::Read, Self::Deleted)
        )
    }

    /// Validate a transition against the legal graph.
    pub fn try_transition(
        &self,
        to: MessageLifecycle,
    ) -> Result<MessageLifecycle, StateTransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StateTransitionError::new("message", self, to))
        }
    }
}

impl std::fmt::Display for MessageLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
