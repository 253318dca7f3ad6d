//! # Permission Resolution
//!
//! Computes what a principal may do in a given context. Resolution is a
//! pure union over every effective grant source:
//!
//! - platform-wide system roles on the user record (`admin`, `auditor`),
//! - role assignments that are effective (active status, unexpired) and
//!   whose context applies to the one being checked.
//!
//! There are no deny rules. A missing permission is an ordinary `false`,
//! never an error; the store-backed wrapper in `audex-domain` is the
//! layer that rejects malformed input (unknown user, malformed context
//! id) before calling in here.

use std::collections::HashSet;

use audex_core::RoleId;
use audex_schema::{AssignmentContext, RoleAssignment, RoleTier, User};

use crate::catalog::{Permission, RoleCatalog};

/// Context-scoped permission resolver over an injected catalog.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    catalog: RoleCatalog,
}

impl PermissionResolver {
    /// Build a resolver over a validated catalog.
    pub fn new(catalog: RoleCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this resolver consults.
    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// The union of permissions the user holds in `context`.
    ///
    /// `None` means the system-wide scope: only platform roles count and
    /// scoped assignments are ignored.
    pub fn effective_permissions(
        &self,
        user: &User,
        assignments: &[RoleAssignment],
        context: Option<&AssignmentContext>,
    ) -> HashSet<Permission> {
        let mut granted = HashSet::new();

        // Platform roles apply in every context.
        for role in &user.system_roles {
            if role.tier() != RoleTier::System {
                continue;
            }
            if let Ok(role_id) = RoleId::new(role.name()) {
                if let Some(def) = self.catalog.flat_role(&role_id) {
                    granted.extend(def.permissions.iter().cloned());
                }
            }
        }

        let Some(context) = context else {
            return granted;
        };

        for assignment in assignments {
            if assignment.user_id != user.user_id {
                continue;
            }
            if !assignment.is_effective() || !assignment.applies_to(context) {
                continue;
            }
            if let Some(def) = self.catalog.engagement_role(&assignment.role_id) {
                granted.extend(def.permissions.iter().cloned());
            } else if let Some(def) = self.catalog.flat_role(&assignment.role_id) {
                granted.extend(def.permissions.iter().cloned());
            }
        }

        granted
    }

    /// Whether the user holds `permission` in `context`.
    pub fn has_permission(
        &self,
        user: &User,
        assignments: &[RoleAssignment],
        permission: &Permission,
        context: Option<&AssignmentContext>,
    ) -> bool {
        self.effective_permissions(user, assignments, context)
            .contains(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audex_core::{EngagementId, OrgId, Timestamp, UserId};
    use audex_schema::SystemRole;
    use audex_state::AssignmentStatus;
    use chrono::{Duration, Utc};

    fn resolver() -> PermissionResolver {
        PermissionResolver::new(RoleCatalog::standard())
    }

    fn engagement_context() -> AssignmentContext {
        AssignmentContext::Engagement {
            engagement_id: EngagementId::new("acme_soc2t2_2603:1").unwrap(),
        }
    }

    fn sme_assignment(user: &User) -> RoleAssignment {
        RoleAssignment::new(
            user.user_id,
            RoleId::new("engagement_sme").unwrap(),
            engagement_context(),
            UserId::new(),
        )
    }

    fn user() -> User {
        User::new("sam@acme.com", "Sam", "Lee")
    }

    #[test]
    fn test_no_grants_means_no_permissions() {
        let u = user();
        assert!(!resolver().has_permission(
            &u,
            &[],
            &Permission::new("engagement.read"),
            Some(&engagement_context()),
        ));
    }

    #[test]
    fn test_admin_system_role_applies_everywhere() {
        let mut u = user();
        u.system_roles = vec![SystemRole::Admin];
        let r = resolver();
        let perm = Permission::new("engagements.manage");
        assert!(r.has_permission(&u, &[], &perm, None));
        assert!(r.has_permission(&u, &[], &perm, Some(&engagement_context())));
    }

    #[test]
    fn test_customer_tier_user_roles_grant_nothing_directly() {
        let mut u = user();
        u.system_roles = vec![SystemRole::Owner];
        let r = resolver();
        assert!(r
            .effective_permissions(&u, &[], Some(&engagement_context()))
            .is_empty());
    }

    #[test]
    fn test_assignment_grants_in_its_context_only() {
        let u = user();
        let assignment = sme_assignment(&u);
        let r = resolver();
        let perm = Permission::new("controls.respond");

        assert!(r.has_permission(&u, &[assignment.clone()], &perm, Some(&engagement_context())));
        // Same assignment does not leak into the system-wide scope or a
        // foreign engagement.
        assert!(!r.has_permission(&u, &[assignment.clone()], &perm, None));
        let foreign = AssignmentContext::Engagement {
            engagement_id: EngagementId::new("globex_soc2t2_2603:1").unwrap(),
        };
        assert!(!r.has_permission(&u, &[assignment], &perm, Some(&foreign)));
    }

    #[test]
    fn test_org_wide_assignment_covers_owned_engagement() {
        let u = user();
        let assignment = RoleAssignment::new(
            u.user_id,
            RoleId::new("engagement_owner").unwrap(),
            AssignmentContext::Organization {
                org_id: OrgId::new("acme").unwrap(),
            },
            UserId::new(),
        );
        assert!(resolver().has_permission(
            &u,
            &[assignment],
            &Permission::new("controls.respond"),
            Some(&engagement_context()),
        ));
    }

    #[test]
    fn test_expired_assignment_is_ignored_passively() {
        let u = user();
        let assignment = sme_assignment(&u)
            .expiring(Timestamp::from_utc(Utc::now() - Duration::hours(1)));
        assert!(!resolver().has_permission(
            &u,
            &[assignment],
            &Permission::new("controls.respond"),
            Some(&engagement_context()),
        ));
    }

    #[test]
    fn test_suspended_assignment_is_ignored() {
        let u = user();
        let mut assignment = sme_assignment(&u);
        assignment.status = AssignmentStatus::Suspended;
        assert!(!resolver().has_permission(
            &u,
            &[assignment],
            &Permission::new("controls.respond"),
            Some(&engagement_context()),
        ));
    }

    #[test]
    fn test_someone_elses_assignment_does_not_count() {
        let u = user();
        let other = user();
        let assignment = sme_assignment(&other);
        assert!(!resolver().has_permission(
            &u,
            &[assignment],
            &Permission::new("controls.respond"),
            Some(&engagement_context()),
        ));
    }

    #[test]
    fn test_permissions_union_across_sources() {
        let mut u = user();
        u.system_roles = vec![SystemRole::Auditor];
        let assignment = sme_assignment(&u);
        let perms =
            resolver().effective_permissions(&u, &[assignment], Some(&engagement_context()));
        // From the auditor platform role.
        assert!(perms.contains(&Permission::new("controls.review")));
        // From the engagement assignment.
        assert!(perms.contains(&Permission::new("controls.respond")));
    }
}
