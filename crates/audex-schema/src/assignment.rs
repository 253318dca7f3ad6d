//! # Role Assignment Entity
//!
//! Links a user to a role within a context (organization or engagement).
//! Compound-unique on (user, organization) — a user holds at most one
//! assignment record per organization.
//!
//! Expiry is passive: every read path calls [`RoleAssignment::is_effective`],
//! which treats a past `expires_at` as inactive. A background sweep may
//! purge expired records opportunistically, but nothing depends on it.

use serde::{Deserialize, Serialize};

use audex_core::{AssignmentId, EngagementId, OrgId, RoleId, Timestamp, UserId};
use audex_state::AssignmentStatus;

/// Where an assignment applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum AssignmentContext {
    /// Organization-wide.
    Organization {
        /// The organization.
        org_id: OrgId,
    },
    /// Scoped to a single engagement.
    Engagement {
        /// The engagement.
        engagement_id: EngagementId,
    },
}

impl AssignmentContext {
    /// The organization this context belongs to, when determinable from
    /// the context alone.
    pub fn org_id(&self) -> Option<&OrgId> {
        match self {
            Self::Organization { org_id } => Some(org_id),
            Self::Engagement { .. } => None,
        }
    }
}

/// A role granted to a user within a context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Record identifier.
    pub id: AssignmentId,
    /// The grantee.
    pub user_id: UserId,
    /// The granted role.
    pub role_id: RoleId,
    /// Where the grant applies.
    pub context: AssignmentContext,
    /// Who made the grant.
    pub assigned_by: UserId,
    /// When the grant was made.
    pub assigned_at: Timestamp,
    /// Optional expiry; past values make the record inactive on read.
    pub expires_at: Option<Timestamp>,
    /// Administrative status.
    pub status: AssignmentStatus,
}

impl RoleAssignment {
    /// Create an active, non-expiring assignment.
    pub fn new(
        user_id: UserId,
        role_id: RoleId,
        context: AssignmentContext,
        assigned_by: UserId,
    ) -> Self {
        Self {
            id: AssignmentId::new(),
            user_id,
            role_id,
            context,
            assigned_by,
            assigned_at: Timestamp::now(),
            expires_at: None,
            status: AssignmentStatus::Active,
        }
    }

    /// Set an expiry.
    pub fn expiring(mut self, at: Timestamp) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Whether the assignment currently grants anything: status is
    /// `Active` and any expiry lies in the future.
    pub fn is_effective(&self) -> bool {
        self.status == AssignmentStatus::Active
            && !self.expires_at.is_some_and(|at| at.is_past())
    }

    /// Whether this assignment applies within the given context. An
    /// organization-wide grant also covers engagement contexts owned by
    /// that organization's engagements (matched by slug prefix).
    pub fn applies_to(&self, context: &AssignmentContext) -> bool {
        match (&self.context, context) {
            (a, b) if a == b => true,
            (
                AssignmentContext::Organization { org_id },
                AssignmentContext::Engagement { engagement_id },
            ) => engagement_id.org_slug() == org_id.as_str(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn org_context() -> AssignmentContext {
        AssignmentContext::Organization {
            org_id: OrgId::new("acme").unwrap(),
        }
    }

    fn assignment() -> RoleAssignment {
        RoleAssignment::new(
            UserId::new(),
            RoleId::new("manager").unwrap(),
            org_context(),
            UserId::new(),
        )
    }

    #[test]
    fn test_fresh_assignment_is_effective() {
        assert!(assignment().is_effective());
    }

    #[test]
    fn test_past_expiry_is_passively_inactive() {
        let expired = assignment()
            .expiring(Timestamp::from_utc(Utc::now() - Duration::hours(1)));
        assert_eq!(expired.status, AssignmentStatus::Active);
        assert!(!expired.is_effective());
    }

    #[test]
    fn test_future_expiry_still_effective() {
        let a = assignment().expiring(Timestamp::from_utc(Utc::now() + Duration::hours(1)));
        assert!(a.is_effective());
    }

    #[test]
    fn test_suspended_is_not_effective() {
        let mut a = assignment();
        a.status = AssignmentStatus::Suspended;
        assert!(!a.is_effective());
    }

    #[test]
    fn test_org_grant_covers_owned_engagements() {
        let a = assignment();
        let own = AssignmentContext::Engagement {
            engagement_id: EngagementId::new("acme_soc2t2_2603:1").unwrap(),
        };
        let foreign = AssignmentContext::Engagement {
            engagement_id: EngagementId::new("globex_soc2t2_2603:1").unwrap(),
        };
        assert!(a.applies_to(&own));
        assert!(!a.applies_to(&foreign));
        assert!(a.applies_to(&org_context()));
    }

    #[test]
    fn test_engagement_grant_does_not_widen() {
        let engagement = AssignmentContext::Engagement {
            engagement_id: EngagementId::new("acme_soc2t2_2603:1").unwrap(),
        };
        let a = RoleAssignment::new(
            UserId::new(),
            RoleId::new("sme").unwrap(),
            engagement.clone(),
            UserId::new(),
        );
        assert!(a.applies_to(&engagement));
        assert!(!a.applies_to(&org_context()));
    }
}
