//! # Role Catalog
//!
//! The closed set of role definitions the platform recognizes, injected
//! into the permission resolver at construction. [`RoleCatalog::standard()`]
//! provides the stock definitions; deployments may construct their own
//! catalog, which is validated for closed-world consistency before use.

use serde::{Deserialize, Serialize};

use audex_core::{DomainError, RoleId};

/// A named capability, e.g. `engagement.read` or `controls.review`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission(pub String);

impl Permission {
    /// Wrap a permission name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The permission name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of an engagement a role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    /// Platform operations.
    System,
    /// Audit-firm consultants.
    Consultant,
    /// Customer-side participants.
    Customer,
}

/// Access level hierarchy, lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Read-only visibility.
    Viewer,
    /// Can respond and upload evidence.
    Contributor,
    /// Can steer the engagement and its roster.
    Manager,
    /// Full control.
    Admin,
}

/// A plain role definition: system and organization roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub id: RoleId,
    /// Human-readable name.
    pub name: String,
    /// Permissions granted by this role.
    pub permissions: Vec<Permission>,
}

/// An engagement role definition, extending [`RoleDefinition`] with the
/// engagement-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRoleDefinition {
    /// Stable role identifier.
    pub id: RoleId,
    /// Human-readable name.
    pub name: String,
    /// Role category.
    pub category: RoleCategory,
    /// Access level in the fixed hierarchy.
    pub access_level: AccessLevel,
    /// Permissions granted by this role.
    pub permissions: Vec<Permission>,
    /// Roles this role may grant and revoke. Closed-world: every entry
    /// must name a role in the catalog's engagement-role enumeration.
    pub can_manage_roles: Vec<RoleId>,
}

/// The full, closed set of role definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCatalog {
    /// Platform-wide roles.
    pub system: Vec<RoleDefinition>,
    /// Organization-scoped roles.
    pub organization: Vec<RoleDefinition>,
    /// Engagement-scoped roles.
    pub engagement: Vec<EngagementRoleDefinition>,
}

impl RoleCatalog {
    /// Validate closed-world consistency: unique ids within each group,
    /// and every `can_manage_roles` entry resolving to an engagement role.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = std::collections::HashSet::new();
        for id in self
            .system
            .iter()
            .map(|r| &r.id)
            .chain(self.organization.iter().map(|r| &r.id))
            .chain(self.engagement.iter().map(|r| &r.id))
        {
            if !seen.insert(id.clone()) {
                return Err(DomainError::invalid_field(
                    "roles",
                    format!("duplicate role id in catalog: {id}"),
                ));
            }
        }

        let engagement_ids: std::collections::HashSet<&RoleId> =
            self.engagement.iter().map(|r| &r.id).collect();
        for role in &self.engagement {
            for managed in &role.can_manage_roles {
                if !engagement_ids.contains(managed) {
                    return Err(DomainError::invalid_field(
                        "can_manage_roles",
                        format!("role {} references unknown role {managed}", role.id),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Look up an engagement role by id.
    pub fn engagement_role(&self, id: &RoleId) -> Option<&EngagementRoleDefinition> {
        self.engagement.iter().find(|r| &r.id == id)
    }

    /// Look up a system or organization role by id.
    pub fn flat_role(&self, id: &RoleId) -> Option<&RoleDefinition> {
        self.system
            .iter()
            .chain(self.organization.iter())
            .find(|r| &r.id == id)
    }

    /// Whether a role id exists anywhere in the catalog.
    pub fn contains(&self, id: &RoleId) -> bool {
        self.flat_role(id).is_some() || self.engagement_role(id).is_some()
    }

    /// Whether the holder of `actor` may grant or revoke `target`.
    ///
    /// The admin role manages every subordinate engagement role; the
    /// owner role manages customer-tier roles only; all other roles
    /// manage none. This is encoded in the stock catalog's
    /// `can_manage_roles` closures, so the check is a lookup.
    pub fn can_manage(&self, actor: &RoleId, target: &RoleId) -> bool {
        self.engagement_role(actor)
            .is_some_and(|role| role.can_manage_roles.contains(target))
    }

    /// The stock catalog.
    pub fn standard() -> Self {
        let p = |names: &[&str]| names.iter().map(|n| Permission::new(*n)).collect();
        let ids = |names: &[&str]| {
            names
                .iter()
                .map(|n| RoleId::new(*n).expect("static role id"))
                .collect()
        };
        let rid = |name: &str| RoleId::new(name).expect("static role id");

        let customer_tier = [
            "engagement_owner",
            "engagement_manager",
            "engagement_sme",
            "engagement_control_owner",
            "engagement_executive",
        ];
        let all_subordinate = [
            "lead_auditor",
            "staff_auditor",
            "engagement_owner",
            "engagement_manager",
            "engagement_sme",
            "engagement_control_owner",
            "engagement_executive",
        ];

        Self {
            system: vec![
                RoleDefinition {
                    id: rid("admin"),
                    name: "Platform Administrator".into(),
                    permissions: p(&[
                        "org.create",
                        "org.manage",
                        "users.manage",
                        "engagements.manage",
                        "controls.review",
                        "reports.publish",
                    ]),
                },
                RoleDefinition {
                    id: rid("auditor"),
                    name: "Auditor".into(),
                    permissions: p(&[
                        "engagements.manage",
                        "controls.review",
                        "reports.publish",
                    ]),
                },
            ],
            organization: vec![
                RoleDefinition {
                    id: rid("org_owner"),
                    name: "Organization Owner".into(),
                    permissions: p(&["org.manage", "users.invite", "engagements.read"]),
                },
                RoleDefinition {
                    id: rid("org_member"),
                    name: "Organization Member".into(),
                    permissions: p(&["engagements.read"]),
                },
            ],
            engagement: vec![
                EngagementRoleDefinition {
                    id: rid("engagement_admin"),
                    name: "Engagement Administrator".into(),
                    category: RoleCategory::System,
                    access_level: AccessLevel::Admin,
                    permissions: p(&[
                        "engagement.read",
                        "engagement.manage",
                        "controls.review",
                        "controls.respond",
                        "messages.post",
                    ]),
                    can_manage_roles: ids(&all_subordinate),
                },
                EngagementRoleDefinition {
                    id: rid("lead_auditor"),
                    name: "Lead Auditor".into(),
                    category: RoleCategory::Consultant,
                    access_level: AccessLevel::Manager,
                    permissions: p(&[
                        "engagement.read",
                        "controls.review",
                        "messages.post",
                    ]),
                    can_manage_roles: vec![],
                },
                EngagementRoleDefinition {
                    id: rid("staff_auditor"),
                    name: "Staff Auditor".into(),
                    category: RoleCategory::Consultant,
                    access_level: AccessLevel::Contributor,
                    permissions: p(&["engagement.read", "controls.review", "messages.post"]),
                    can_manage_roles: vec![],
                },
                EngagementRoleDefinition {
                    id: rid("engagement_owner"),
                    name: "Engagement Owner".into(),
                    category: RoleCategory::Customer,
                    access_level: AccessLevel::Manager,
                    permissions: p(&[
                        "engagement.read",
                        "controls.respond",
                        "messages.post",
                    ]),
                    can_manage_roles: ids(&customer_tier),
                },
                EngagementRoleDefinition {
                    id: rid("engagement_manager"),
                    name: "Engagement Manager".into(),
                    category: RoleCategory::Customer,
                    access_level: AccessLevel::Contributor,
                    permissions: p(&["engagement.read", "controls.respond", "messages.post"]),
                    can_manage_roles: vec![],
                },
                EngagementRoleDefinition {
                    id: rid("engagement_sme"),
                    name: "Subject-Matter Expert".into(),
                    category: RoleCategory::Customer,
                    access_level: AccessLevel::Contributor,
                    permissions: p(&["engagement.read", "controls.respond", "messages.post"]),
                    can_manage_roles: vec![],
                },
                EngagementRoleDefinition {
                    id: rid("engagement_control_owner"),
                    name: "Control Owner".into(),
                    category: RoleCategory::Customer,
                    access_level: AccessLevel::Contributor,
                    permissions: p(&["engagement.read", "controls.respond", "messages.post"]),
                    can_manage_roles: vec![],
                },
                EngagementRoleDefinition {
                    id: rid("engagement_executive"),
                    name: "Executive Sponsor".into(),
                    category: RoleCategory::Customer,
                    access_level: AccessLevel::Viewer,
                    permissions: p(&["engagement.read"]),
                    can_manage_roles: vec![],
                },
            ],
        }
    }
}
