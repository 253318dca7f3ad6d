//! # Organization Manager
//!
//! Onboarding and lifecycle workflows for customer organizations:
//! unique-id generation from the formal name, cross-organization domain
//! collision checks, and status transitions.

use audex_core::{DomainError, OrgId, Timestamp};
use audex_schema::Organization;
use audex_state::OrgStatus;
use audex_store::DocumentStore;

/// Upper bound on sequential `-n` probes before falling back to a
/// timestamp suffix.
const MAX_ID_PROBES: u32 = 1000;

/// Parameters for creating an organization.
#[derive(Debug, Clone)]
pub struct CreateOrganization {
    /// Formal registered name. Required.
    pub name: String,
    /// Preferred slug; derived from the name when absent.
    pub requested_id: Option<String>,
    /// Initial domain claims.
    pub org_domains: Vec<String>,
}

/// Multi-step organization workflows atop the store.
#[derive(Debug, Clone)]
pub struct OrganizationManager {
    store: DocumentStore,
}

impl OrganizationManager {
    /// Build a manager over a shared store handle.
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Create an organization: validate the name, secure a free slug id,
    /// check each requested domain against every other organization's
    /// claims, then persist with derived name variants.
    pub async fn create_organization(
        &self,
        request: CreateOrganization,
    ) -> Result<Organization, DomainError> {
        if request.name.trim().is_empty() {
            return Err(DomainError::invalid_field(
                "name",
                "organization name is required",
            ));
        }

        let base = request
            .requested_id
            .unwrap_or_else(|| slugify(&request.name));
        let id = self.ensure_unique_org_id(&base).await?;

        for domain in &request.org_domains {
            if let Some(holder) = self.store.find_organization_by_domain(domain, None).await {
                tracing::warn!(org = %holder.id, domain = %domain, "domain already claimed");
                return Err(DomainError::duplicate("org_domains", domain));
            }
        }

        let mut org = Organization::new(id, request.name);
        org.org_domains = request.org_domains;
        let created = self.store.create_organization(org).await?;
        tracing::info!(org = %created.id, "organization onboarded");
        Ok(created)
    }

    /// Find a free organization id starting from `base`.
    ///
    /// Probes `base`, then `base-1` through `base-1000`; if every probe
    /// collides, falls back to an epoch-seconds suffix rather than
    /// looping unbounded.
    pub async fn ensure_unique_org_id(&self, base: &str) -> Result<OrgId, DomainError> {
        let base = slugify(base);
        let candidate = OrgId::new(&base)?;
        if !self.store.organization_exists(&candidate).await {
            return Ok(candidate);
        }
        for n in 1..=MAX_ID_PROBES {
            let candidate = OrgId::new(format!("{base}-{n}"))?;
            if !self.store.organization_exists(&candidate).await {
                return Ok(candidate);
            }
        }
        tracing::warn!(base = %base, "exhausted id probes, using timestamp suffix");
        OrgId::new(format!("{base}-{}", Timestamp::now().epoch_secs()))
    }

    /// Claim an additional domain for an organization. Fails if any other
    /// non-archived organization already holds it.
    pub async fn add_domain(
        &self,
        id: &OrgId,
        domain: impl Into<String>,
    ) -> Result<Organization, DomainError> {
        let domain = domain.into();
        if let Some(holder) = self
            .store
            .find_organization_by_domain(&domain, Some(id))
            .await
        {
            tracing::warn!(org = %holder.id, domain = %domain, "domain already claimed");
            return Err(DomainError::duplicate("org_domains", &domain));
        }
        let org = self.store.find_organization(id).await?;
        let mut domains = org.org_domains;
        domains.push(domain);
        self.store.update_organization_domains(id, domains).await
    }

    /// Transition an organization's status along the legal graph.
    pub async fn transition_status(
        &self,
        id: &OrgId,
        to: OrgStatus,
    ) -> Result<Organization, DomainError> {
        self.store.update_organization_status(id, to).await
    }

    /// Fetch one organization.
    pub async fn get_organization(&self, id: &OrgId) -> Result<Organization, DomainError> {
        self.store.find_organization(id).await
    }

    /// All organizations.
    pub async fn list_organizations(&self) -> Vec<Organization> {
        self.store.list_organizations().await
    }
}

/// Reduce a display name to a slug: lowercase, alphanumeric runs joined
/// by single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
