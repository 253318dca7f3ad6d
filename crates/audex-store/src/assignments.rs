//! Role-assignment persistence operations.
//!
//! Compound-unique on (user, organization): a user holds one assignment
//! record per organization context. Expiry is passive — `find_effective`
//! filters expired records on read; `purge_expired` is the opportunistic
//! compaction that correctness never depends on.

use audex_core::{AssignmentId, DomainError, UserId};
use audex_schema::{AssignmentContext, RoleAssignment};
use audex_state::AssignmentStatus;

use crate::DocumentStore;

impl DocumentStore {
    /// Insert a new assignment, enforcing the (user, organization)
    /// compound-unique key for organization-scoped grants.
    pub async fn create_assignment(
        &self,
        assignment: RoleAssignment,
    ) -> Result<RoleAssignment, DomainError> {
        let mut assignments = self.collections.assignments.write().await;
        if let AssignmentContext::Organization { org_id } = &assignment.context {
            let collision = assignments.values().any(|a| {
                a.user_id == assignment.user_id
                    && a.context.org_id() == Some(org_id)
            });
            if collision {
                return Err(DomainError::duplicate(
                    "user_id,org_id",
                    format!("{}/{org_id}", assignment.user_id),
                ));
            }
        }
        assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    /// Fetch an assignment by record id.
    pub async fn find_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<RoleAssignment, DomainError> {
        self.collections
            .assignments
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("role assignment", id))
    }

    /// Every assignment currently granting something to `user`: active
    /// status and unexpired. Expired records are skipped, not mutated.
    pub async fn find_effective_assignments(&self, user: &UserId) -> Vec<RoleAssignment> {
        self.collections
            .assignments
            .read()
            .await
            .values()
            .filter(|a| &a.user_id == user && a.is_effective())
            .cloned()
            .collect()
    }

    /// Transition an assignment's status (two-phase).
    pub async fn update_assignment_status(
        &self,
        id: &AssignmentId,
        to: AssignmentStatus,
    ) -> Result<RoleAssignment, DomainError> {
        let mut assignments = self.collections.assignments.write().await;
        let assignment = assignments
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("role assignment", id))?;
        assignment.status.try_transition(to)?;
        assignment.status = to;
        Ok(assignment.clone())
    }

    /// Opportunistically remove records whose expiry has passed.
    /// Returns how many were removed. Read paths never rely on this.
    pub async fn purge_expired_assignments(&self) -> usize {
        let mut assignments = self.collections.assignments.write().await;
        let before = assignments.len();
        assignments.retain(|_, a| !a.expires_at.is_some_and(|at| at.is_past()));
        let removed = before - assignments.len();
        if removed > 0 {
            tracing::debug!(removed, "purged expired role assignments");
        }
        removed
    }
}
