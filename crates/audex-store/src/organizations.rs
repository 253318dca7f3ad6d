//! Organization persistence operations.
//!
//! The organization id is the unique key. Status changes go through the
//! two-phase transition check against the persisted value.

use audex_core::{DomainError, OrgId, Timestamp};
use audex_schema::Organization;
use audex_state::OrgStatus;

use crate::DocumentStore;

impl DocumentStore {
    /// Insert a new organization. The slug id must be free.
    pub async fn create_organization(&self, org: Organization) -> Result<Organization, DomainError> {
        org.validate().into_result()?;
        let mut organizations = self.collections.organizations.write().await;
        if organizations.contains_key(&org.id) {
            return Err(DomainError::duplicate("id", &org.id));
        }
        tracing::debug!(org = %org.id, "organization created");
        organizations.insert(org.id.clone(), org.clone());
        Ok(org)
    }

    /// Fetch an organization by id.
    pub async fn find_organization(&self, id: &OrgId) -> Result<Organization, DomainError> {
        self.collections
            .organizations
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("organization", id))
    }

    /// Whether an organization id is already taken.
    pub async fn organization_exists(&self, id: &OrgId) -> bool {
        self.collections.organizations.read().await.contains_key(id)
    }

    /// All organizations, in no particular order.
    pub async fn list_organizations(&self) -> Vec<Organization> {
        self.collections
            .organizations
            .read()
            .await
            .values()
            .cloned()
            .collect()
    }

    /// The organization (other than `excluding`) that owns `domain`,
    /// if any. Archived organizations do not hold domain claims.
    pub async fn find_organization_by_domain(
        &self,
        domain: &str,
        excluding: Option<&OrgId>,
    ) -> Option<Organization> {
        self.collections
            .organizations
            .read()
            .await
            .values()
            .find(|org| {
                Some(&org.id) != excluding
                    && org.status != OrgStatus::Archived
                    && org.org_domains.iter().any(|d| d == domain)
            })
            .cloned()
    }

    /// Transition an organization's status.
    ///
    /// Two-phase: re-reads the persisted status, validates the move
    /// against the lifecycle graph, and writes only on success. On
    /// rejection the stored record is untouched.
    pub async fn update_organization_status(
        &self,
        id: &OrgId,
        to: OrgStatus,
    ) -> Result<Organization, DomainError> {
        let mut organizations = self.collections.organizations.write().await;
        let org = organizations
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("organization", id))?;
        org.status.try_transition(to)?;
        org.status = to;
        org.updated_at = Timestamp::now();
        tracing::info!(org = %id, status = %to, "organization status changed");
        Ok(org.clone())
    }

    /// Replace the domain list, re-running schema validation.
    pub async fn update_organization_domains(
        &self,
        id: &OrgId,
        domains: Vec<String>,
    ) -> Result<Organization, DomainError> {
        let mut organizations = self.collections.organizations.write().await;
        let org = organizations
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("organization", id))?;

        let mut candidate = org.clone();
        candidate.org_domains = domains;
        candidate.validate().into_result()?;
        candidate.updated_at = Timestamp::now();
        *org = candidate.clone();
        Ok(candidate)
    }
}
