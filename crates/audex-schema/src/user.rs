//! # User Entity
//!
//! A platform account. Users are created on first OAuth login or by
//! explicit invite; the very first account in the system is bootstrapped
//! as an admin.
//!
//! ## Role Tiers
//!
//! System-tier roles (`admin`, `auditor`) belong to the audit firm;
//! customer-tier roles (`owner`, `sme`, `control_owner`, `manager`,
//! `executive`) belong to customer organizations. A single user's role
//! list may never mix the two tiers — assigning one tier strips
//! eligibility for the other.

use serde::{Deserialize, Serialize};

use audex_core::{validate, ControlId, EngagementId, OrgId, RoleId, Timestamp, UserId, ValidationErrors};

/// Maximum number of system roles on one user.
pub const MAX_SYSTEM_ROLES: usize = 5;

/// The closed set of platform-wide roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    /// Platform administrator (system tier).
    Admin,
    /// Audit-firm auditor (system tier).
    Auditor,
    /// Customer account owner.
    Owner,
    /// Customer subject-matter expert.
    Sme,
    /// Customer control owner.
    ControlOwner,
    /// Customer engagement manager.
    Manager,
    /// Customer executive sponsor.
    Executive,
}

/// Which side of the platform a role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleTier {
    /// Audit-firm roles.
    System,
    /// Customer-organization roles.
    Customer,
}

impl SystemRole {
    /// The tier this role belongs to.
    pub fn tier(&self) -> RoleTier {
        match self {
            Self::Admin | Self::Auditor => RoleTier::System,
            Self::Owner | Self::Sme | Self::ControlOwner | Self::Manager | Self::Executive => {
                RoleTier::Customer
            }
        }
    }

    /// The canonical lowercase role name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Auditor => "auditor",
            Self::Owner => "owner",
            Self::Sme => "sme",
            Self::ControlOwner => "control_owner",
            Self::Manager => "manager",
            Self::Executive => "executive",
        }
    }
}

impl std::fmt::Display for SystemRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Verify that a role list does not mix system and customer tiers.
///
/// Returns a descriptive message on violation so callers can surface it
/// as a field error verbatim.
pub fn check_role_mix(roles: &[SystemRole]) -> Result<(), String> {
    let has_system = roles.iter().any(|r| r.tier() == RoleTier::System);
    let has_customer = roles.iter().any(|r| r.tier() == RoleTier::Customer);
    if has_system && has_customer {
        Err(format!(
            "system roles (admin, auditor) and customer roles may not be mixed: {}",
            roles
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    } else {
        Ok(())
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account can sign in.
    Active,
    /// Deactivated by choice or offboarding.
    Inactive,
    /// Locked by an administrator.
    Suspended,
    /// Invited but not yet signed in.
    Pending,
}

/// Identity-provider metadata captured at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Provider name (`google`, `microsoft`, `linkedin`, `okta`).
    pub provider: String,
    /// Provider-side subject identifier.
    pub subject: String,
}

/// A user's participation in one engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementParticipation {
    /// The engagement.
    pub engagement_id: EngagementId,
    /// Engagement roles held in that engagement.
    pub roles: Vec<RoleId>,
    /// Controls assigned to this user in that engagement.
    pub controls: Vec<ControlId>,
    /// Whether the participation is currently active.
    pub active: bool,
}

/// A platform user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Immutable account identifier.
    pub user_id: UserId,
    /// Unique login email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Owning organization, if the user belongs to a customer org.
    pub organization: Option<OrgId>,
    /// Platform-wide roles. At most [`MAX_SYSTEM_ROLES`]; tiers never mix.
    pub system_roles: Vec<SystemRole>,
    /// Per-engagement participation records.
    pub engagements: Vec<EngagementParticipation>,
    /// Account status.
    pub status: UserStatus,
    /// Last successful login.
    pub last_login: Option<Timestamp>,
    /// Identity-provider metadata from the most recent login.
    pub provider: Option<ProviderMetadata>,
    /// Internal only; never serialized out to API consumers.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    /// Internal only; never serialized out to API consumers.
    #[serde(skip_serializing, default)]
    pub reset_token: Option<String>,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl User {
    /// Create a pending user with no roles.
    pub fn new(email: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            organization: None,
            system_roles: Vec::new(),
            engagements: Vec::new(),
            status: UserStatus::Pending,
            last_login: None,
            provider: None,
            password_hash: None,
            reset_token: None,
            created_at: Timestamp::now(),
        }
    }

    /// `first last`, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Whether this user holds a given system role.
    pub fn has_role(&self, role: SystemRole) -> bool {
        self.system_roles.contains(&role)
    }

    /// The participation record for an engagement, if any.
    pub fn participation(&self, engagement: &EngagementId) -> Option<&EngagementParticipation> {
        self.engagements
            .iter()
            .find(|p| &p.engagement_id == engagement)
    }

    /// Check every structural constraint, collecting all failures.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if !validate::is_valid_email(&self.email) {
            errors.push("email", format!("invalid email address: {:?}", self.email));
        }
        if self.system_roles.len() > MAX_SYSTEM_ROLES {
            errors.push(
                "system_roles",
                format!("at most {MAX_SYSTEM_ROLES} system roles allowed"),
            );
        }
        let mut seen = std::collections::HashSet::new();
        for role in &self.system_roles {
            if !seen.insert(role) {
                errors.push("system_roles", format!("duplicate role: {role}"));
            }
        }
        if let Err(message) = check_role_mix(&self.system_roles) {
            errors.push("system_roles", message);
        }
        let mut seen_engagements = std::collections::HashSet::new();
        for participation in &self.engagements {
            if !seen_engagements.insert(&participation.engagement_id) {
                errors.push(
                    "engagements",
                    format!("duplicate participation in {}", participation.engagement_id),
                );
            }
            if participation.roles.is_empty() {
                errors.push(
                    "engagements",
                    format!(
                        "participation in {} requires at least one role",
                        participation.engagement_id
                    ),
                );
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("sam@acme.com", "Sam", "Lee")
    }

    #[test]
    fn test_new_user_is_pending_with_no_roles() {
        let u = user();
        assert_eq!(u.status, UserStatus::Pending);
        assert!(u.system_roles.is_empty());
        assert_eq!(u.full_name(), "Sam Lee");
    }

    #[test]
    fn test_valid_user_passes() {
        let mut u = user();
        u.system_roles = vec![SystemRole::Owner, SystemRole::Sme];
        assert!(u.validate().is_empty());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut u = user();
        u.email = "sam-at-acme".into();
        assert!(!u.validate().is_empty());
    }

    #[test]
    fn test_tier_mixing_rejected_with_descriptive_message() {
        let mut u = user();
        u.system_roles = vec![SystemRole::Admin, SystemRole::Owner];
        let errors = u.validate();
        assert_eq!(errors.field_errors.len(), 1);
        assert!(errors.field_errors[0].message.contains("may not be mixed"));
        assert!(errors.field_errors[0].message.contains("admin"));
        assert!(errors.field_errors[0].message.contains("owner"));
    }

    #[test]
    fn test_all_customer_roles_together_allowed() {
        let mut u = user();
        u.system_roles = vec![
            SystemRole::Owner,
            SystemRole::Sme,
            SystemRole::ControlOwner,
            SystemRole::Manager,
            SystemRole::Executive,
        ];
        assert!(u.validate().is_empty());
    }

    #[test]
    fn test_role_limit_and_duplicates() {
        let mut u = user();
        u.system_roles = vec![SystemRole::Owner; 6];
        let errors = u.validate();
        // Over the limit, plus five duplicate entries.
        assert!(errors.field_errors.len() >= 2);
    }

    #[test]
    fn test_participation_requires_a_role() {
        let mut u = user();
        u.engagements.push(EngagementParticipation {
            engagement_id: EngagementId::new("acme_soc2t2_2603:1").unwrap(),
            roles: vec![],
            controls: vec![],
            active: true,
        });
        assert!(!u.validate().is_empty());
    }

    #[test]
    fn test_duplicate_participation_rejected() {
        let mut u = user();
        for _ in 0..2 {
            u.engagements.push(EngagementParticipation {
                engagement_id: EngagementId::new("acme_soc2t2_2603:1").unwrap(),
                roles: vec![RoleId::new("engagement_sme").unwrap()],
                controls: vec![],
                active: true,
            });
        }
        let errors = u.validate();
        assert!(errors.field_errors[0].message.contains("duplicate participation"));
    }

    #[test]
    fn test_internal_fields_never_serialized() {
        let mut u = user();
        u.password_hash = Some("argon2id$...".into());
        u.reset_token = Some("tok".into());
        let json = serde_json::to_string(&u).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("reset_token"));
    }

    #[test]
    fn test_tiers() {
        assert_eq!(SystemRole::Admin.tier(), RoleTier::System);
        assert_eq!(SystemRole::Auditor.tier(), RoleTier::System);
        assert_eq!(SystemRole::ControlOwner.tier(), RoleTier::Customer);
    }
}
