//! # Audit Core — Composition Root
//!
//! Constructs the store and every domain manager exactly once and
//! exposes the stable method surface other subsystems consume. Handlers
//! receive the core by shared reference; there is no lazy global state.

use audex_core::{ControlId, DomainError};
use audex_roles::RoleCatalog;
use audex_store::{DocumentStore, HealthReport};

use crate::auth::UserManager;
use crate::config::AudexConfig;
use crate::engagement::EngagementManager;
use crate::framework::{AssessmentState, Framework, FrameworkManager, GapAnalysis};
use crate::messaging::MessagingManager;
use crate::organization::OrganizationManager;

/// The assembled Audex core: one store, one manager per domain.
#[derive(Debug, Clone)]
pub struct AuditCore {
    store: DocumentStore,
    /// Organization onboarding and lifecycle.
    pub organizations: OrganizationManager,
    /// Accounts, sessions, roles, and permissions.
    pub users: UserManager,
    /// Engagement and control-profile workflows.
    pub engagements: EngagementManager,
    /// Framework catalogs, scoring, and gap analysis.
    pub frameworks: FrameworkManager,
    /// Engagement messaging.
    pub messaging: MessagingManager,
}

impl AuditCore {
    /// Assemble the core from configuration and the stock role catalog.
    pub fn new(config: AudexConfig) -> Result<Self, DomainError> {
        Self::with_catalog(config, RoleCatalog::standard())
    }

    /// Assemble the core with a custom role catalog, which is validated
    /// for closed-world consistency before anything is built on it.
    pub fn with_catalog(
        config: AudexConfig,
        catalog: RoleCatalog,
    ) -> Result<Self, DomainError> {
        catalog.validate()?;
        let store = DocumentStore::new(config.store_config());
        tracing::info!(
            frameworks = config.available_frameworks.len(),
            max_participants = config.max_engagement_participants,
            "audit core initialized"
        );
        Ok(Self {
            organizations: OrganizationManager::new(store.clone()),
            users: UserManager::new(store.clone(), catalog.clone()),
            engagements: EngagementManager::new(store.clone(), catalog),
            frameworks: FrameworkManager::standard(),
            messaging: MessagingManager::new(store.clone()),
            store,
        })
    }

    /// The shared store handle.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    // ─── Collaborator surface ───────────────────────────────────────────

    /// Look up a framework definition by name.
    pub async fn get_framework(&self, name: &str) -> Result<Framework, DomainError> {
        self.frameworks.get_framework(name).await
    }

    /// The compliance score for a framework, in `[0, 1]`.
    pub async fn calculate_compliance_score(&self, name: &str) -> Result<f64, DomainError> {
        self.frameworks.calculate_compliance_score(name).await
    }

    /// Partition a framework's control set by assessment outcome.
    pub async fn perform_gap_analysis(&self, name: &str) -> Result<GapAnalysis, DomainError> {
        self.frameworks.perform_gap_analysis(name).await
    }

    /// Record an assessment for one framework control.
    pub async fn assess_control(
        &self,
        framework: &str,
        control: &ControlId,
        assessment: AssessmentState,
    ) -> Result<(), DomainError> {
        self.frameworks
            .assess_control(framework, control, assessment)
            .await
    }

    /// Report the store's lifecycle state.
    pub async fn health_check(&self) -> HealthReport {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_core_assembles_and_reports_healthy() {
        let core = AuditCore::new(AudexConfig::default()).unwrap();
        let report = core.health_check().await;
        assert_eq!(report.status, "ok");
    }

    #[tokio::test]
    async fn test_managers_share_one_store() {
        let core = AuditCore::new(AudexConfig::default()).unwrap();
        let org = core
            .organizations
            .create_organization(crate::organization::CreateOrganization {
                name: "Acme".into(),
                requested_id: None,
                org_domains: vec![],
            })
            .await
            .unwrap();
        // Visible through the shared store handle.
        assert!(core.store().find_organization(&org.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_inconsistent_catalog_rejected_at_assembly() {
        let mut catalog = RoleCatalog::standard();
        catalog.engagement[0]
            .can_manage_roles
            .push(audex_core::RoleId::new("phantom_role").unwrap());
        assert!(AuditCore::with_catalog(AudexConfig::default(), catalog).is_err());
    }

    #[tokio::test]
    async fn test_collaborator_surface() {
        let core = AuditCore::new(AudexConfig::default()).unwrap();
        let soc2 = core.get_framework("soc2").await.unwrap();
        let first = soc2.controls[0].id.clone();
        core.assess_control("soc2", &first, AssessmentState::Compliant)
            .await
            .unwrap();
        assert!(core.calculate_compliance_score("soc2").await.unwrap() > 0.0);
        let gaps = core.perform_gap_analysis("soc2").await.unwrap();
        assert_eq!(gaps.compliant, vec![first]);
        assert_eq!(gaps.unassessed.len(), soc2.controls.len() - 1);
    }
}
