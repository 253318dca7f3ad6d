//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all identifiers in the Audex platform. These
//! prevent accidental identifier confusion — you cannot pass a `UserId`
//! where an `OrgId` is expected.
//!
//! String-backed identifiers (`OrgId`, `EngagementId`, `ControlId`,
//! `RoleId`) have validated constructors that reject malformed input at
//! the boundary. Relations between entities are always expressed through
//! these ids, never through live references.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Immutable, slug-shaped organization identifier (e.g. `acme-corp`).
///
/// Lowercase alphanumeric segments separated by single hyphens. Assigned
/// at creation and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(String);

impl OrgId {
    /// Validate and wrap an organization slug.
    pub fn new(slug: impl Into<String>) -> Result<Self, DomainError> {
        let slug = slug.into();
        if !crate::validate::is_valid_slug(&slug) {
            return Err(DomainError::malformed_id("organization", &slug));
        }
        Ok(Self(slug))
    }

    /// The slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Generate a new random message identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Unique identifier for a role assignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub Uuid);

impl AssignmentId {
    /// Generate a new random assignment identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Identifier for a framework requirement / control (e.g. `CC6.1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlId(String);

impl ControlId {
    /// Wrap a control identifier. Rejects empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::malformed_id("control", &id));
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier for a role definition (e.g. `admin`, `control_owner`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(String);

impl RoleId {
    /// Wrap a role identifier. Rejects empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::malformed_id("role", &id));
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Engagement identifier of the form `org_type_yymm:v`.
///
/// The left side is underscore-separated: the owning organization slug,
/// the engagement type code, and a four-digit `yymm` period. The suffix
/// after the colon is a numeric version.
///
/// Examples: `acme_soc2t2_2603:1`, `globex_iso27001_2611:2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngagementId(String);

impl EngagementId {
    /// Validate and wrap an engagement identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if !is_valid_engagement_id(&id) {
            return Err(DomainError::malformed_id("engagement", &id));
        }
        Ok(Self(id))
    }

    /// Build an engagement id from its components.
    pub fn compose(
        org: &OrgId,
        type_code: &str,
        yymm: &str,
        version: u32,
    ) -> Result<Self, DomainError> {
        Self::new(format!("{}_{}_{}:{}", org.as_str(), type_code, yymm, version))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The organization slug component.
    pub fn org_slug(&self) -> &str {
        // Construction guarantees at least two underscores before the colon.
        self.0.split('_').next().unwrap_or("")
    }
}

fn is_valid_engagement_id(id: &str) -> bool {
    let Some((left, version)) = id.rsplit_once(':') else {
        return false;
    };
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let segments: Vec<&str> = left.split('_').collect();
    if segments.len() < 3 {
        return false;
    }
    // The final segment is the yymm period; everything before it must be
    // non-empty lowercase alphanumeric (the org slug may itself contain
    // hyphens).
    let period = segments[segments.len() - 1];
    if period.len() != 4 || !period.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let month: u32 = period[2..].parse().unwrap_or(0);
    if !(1..=12).contains(&month) {
        return false;
    }
    segments[..segments.len() - 1].iter().all(|s| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    })
}

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "message:{}", self.0)
    }
}

impl std::fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "assignment:{}", self.0)
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for EngagementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_id_accepts_slug() {
        assert!(OrgId::new("acme").is_ok());
        assert!(OrgId::new("acme-corp-2").is_ok());
    }

    #[test]
    fn test_org_id_rejects_non_slug() {
        assert!(OrgId::new("").is_err());
        assert!(OrgId::new("Acme Corp").is_err());
        assert!(OrgId::new("acme_corp").is_err());
        assert!(OrgId::new("-acme").is_err());
        assert!(OrgId::new("acme-").is_err());
    }

    #[test]
    fn test_engagement_id_valid_shapes() {
        assert!(EngagementId::new("acme_soc2t2_2603:1").is_ok());
        assert!(EngagementId::new("acme-corp_iso27001_2611:12").is_ok());
    }

    #[test]
    fn test_engagement_id_invalid_shapes() {
        assert!(EngagementId::new("acme_soc2t2_2603").is_err()); // no version
        assert!(EngagementId::new("acme_2603:1").is_err()); // missing type
        assert!(EngagementId::new("acme_soc2t2_2613:1").is_err()); // month 13
        assert!(EngagementId::new("acme_soc2t2_603:1").is_err()); // 3-digit period
        assert!(EngagementId::new("acme_soc2t2_2603:x").is_err()); // non-numeric version
        assert!(EngagementId::new("ACME_soc2t2_2603:1").is_err()); // uppercase slug
    }

    #[test]
    fn test_engagement_id_compose_and_org_slug() {
        let org = OrgId::new("acme").unwrap();
        let id = EngagementId::compose(&org, "soc2t2", "2603", 1).unwrap();
        assert_eq!(id.as_str(), "acme_soc2t2_2603:1");
        assert_eq!(id.org_slug(), "acme");
    }

    #[test]
    fn test_user_ids_are_unique() {
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn test_control_and_role_ids_reject_empty() {
        assert!(ControlId::new("  ").is_err());
        assert!(RoleId::new("").is_err());
        assert!(ControlId::new("CC6.1").is_ok());
        assert!(RoleId::new("admin").is_ok());
    }
}
