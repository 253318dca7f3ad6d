//! # Organization Entity
//!
//! A customer organization: the tenant boundary for users, engagements,
//! and role assignments. The slug id is assigned at creation and never
//! changes; organizations are archived rather than deleted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use audex_core::{validate, OrgId, Timestamp, ValidationErrors};
use audex_state::OrgStatus;

/// Maximum number of domains an organization may claim.
pub const MAX_ORG_DOMAINS: usize = 10;

/// A customer organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Immutable slug identifier.
    pub id: OrgId,
    /// Formal registered name.
    pub name: String,
    /// Short name derived from the initials of the formal name.
    pub short_name: String,
    /// Display name; defaults to the formal name.
    pub friendly_name: String,
    /// Lifecycle status.
    pub status: OrgStatus,
    /// Email/web domains owned by this organization. Used to route OAuth
    /// signups; must not collide with another organization's domains.
    pub org_domains: Vec<String>,
    /// Free-form per-organization settings.
    pub settings: HashMap<String, serde_json::Value>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last modified.
    pub updated_at: Timestamp,
}

impl Organization {
    /// Create a new organization in `Pending` status with derived name
    /// variants: the short name is the initials of the formal name, the
    /// friendly name defaults to the formal name.
    pub fn new(id: OrgId, name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Timestamp::now();
        Self {
            short_name: initials(&name),
            friendly_name: name.clone(),
            id,
            name,
            status: OrgStatus::Pending,
            org_domains: Vec::new(),
            settings: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the organization is operational.
    pub fn is_active(&self) -> bool {
        self.status == OrgStatus::Active
    }

    /// Check every structural constraint, collecting all failures.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.push("name", "organization name is required");
        }
        if self.org_domains.len() > MAX_ORG_DOMAINS {
            errors.push(
                "org_domains",
                format!("at most {MAX_ORG_DOMAINS} domains allowed"),
            );
        }
        for domain in &self.org_domains {
            if !validate::is_valid_domain(domain) {
                errors.push("org_domains", format!("invalid domain: {domain:?}"));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for domain in &self.org_domains {
            if !seen.insert(domain.as_str()) {
                errors.push("org_domains", format!("duplicate domain: {domain:?}"));
            }
        }
        errors
    }
}

/// Uppercase initials of each whitespace-separated word.
fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> Organization {
        Organization::new(OrgId::new("acme").unwrap(), "Acme Corporation Ltd")
    }

    #[test]
    fn test_derived_name_variants() {
        let org = org();
        assert_eq!(org.short_name, "ACL");
        assert_eq!(org.friendly_name, "Acme Corporation Ltd");
        assert_eq!(org.status, OrgStatus::Pending);
    }

    #[test]
    fn test_valid_organization_passes() {
        let mut org = org();
        org.org_domains = vec!["acme.com".into(), "acme.co.uk".into()];
        assert!(org.validate().is_empty());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut org = org();
        org.name = "   ".into();
        let errors = org.validate();
        assert_eq!(errors.field_errors.len(), 1);
        assert_eq!(errors.field_errors[0].field, "name");
    }

    #[test]
    fn test_domain_limit_enforced() {
        let mut org = org();
        org.org_domains = (0..11).map(|i| format!("d{i}.acme.com")).collect();
        assert!(!org.validate().is_empty());
    }

    #[test]
    fn test_bad_and_duplicate_domains_rejected() {
        let mut org = org();
        org.org_domains = vec!["not a domain".into(), "acme.com".into(), "acme.com".into()];
        let errors = org.validate();
        assert_eq!(errors.field_errors.len(), 2);
    }

    #[test]
    fn test_is_active() {
        let mut org = org();
        assert!(!org.is_active());
        org.status = OrgStatus::Active;
        assert!(org.is_active());
    }
}
