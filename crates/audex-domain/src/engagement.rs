//! # Audit Engagement Manager
//!
//! Engagement workflows: creation with a versioned identifier, roster
//! management checked against the role catalog, lifecycle steering, and
//! the control-profile assessment loop.

use audex_core::{ControlId, DomainError, EngagementId, OrgId, RoleId, UserId};
use audex_roles::RoleCatalog;
use audex_schema::{
    ControlNote, Engagement, EngagementControlProfile, EngagementParticipation, EngagementType,
    Evidence, FrameworkSelection, Participant, Timeline,
};
use audex_state::{ControlStatus, EngagementStage, EngagementStatus};
use audex_store::DocumentStore;

/// Upper bound on version probes for one (org, type, period) triple.
const MAX_VERSION_PROBES: u32 = 1000;

/// Engagement workflows atop the store and an injected role catalog.
#[derive(Debug, Clone)]
pub struct EngagementManager {
    store: DocumentStore,
    catalog: RoleCatalog,
}

impl EngagementManager {
    /// Build a manager over a shared store handle and a role catalog.
    pub fn new(store: DocumentStore, catalog: RoleCatalog) -> Self {
        Self { store, catalog }
    }

    /// Create an engagement for an existing organization.
    ///
    /// The identifier is composed as `org_type_yymm:v` with the lowest
    /// free version for that triple.
    pub async fn create_engagement(
        &self,
        organization: &OrgId,
        engagement_type: EngagementType,
        period_yymm: &str,
        frameworks: Vec<FrameworkSelection>,
    ) -> Result<Engagement, DomainError> {
        self.store.find_organization(organization).await?;
        let id = self
            .next_engagement_id(organization, engagement_type, period_yymm)
            .await?;
        let engagement = Engagement::new(id, organization.clone(), engagement_type, frameworks);
        let created = self.store.create_engagement(engagement).await?;
        tracing::info!(engagement = %created.id, "engagement created");
        Ok(created)
    }

    /// The lowest free versioned identifier for a triple. Bounded probe,
    /// not an unbounded loop.
    async fn next_engagement_id(
        &self,
        organization: &OrgId,
        engagement_type: EngagementType,
        period_yymm: &str,
    ) -> Result<EngagementId, DomainError> {
        for version in 1..=MAX_VERSION_PROBES {
            let candidate = EngagementId::compose(
                organization,
                engagement_type.code(),
                period_yymm,
                version,
            )?;
            if !self.store.engagement_exists(&candidate).await {
                return Ok(candidate);
            }
        }
        Err(DomainError::duplicate(
            "id",
            format!(
                "{}_{}_{period_yymm}",
                organization.as_str(),
                engagement_type.code()
            ),
        ))
    }

    /// Add a user to the roster with at least one catalog engagement
    /// role, and mirror the participation onto the user record.
    pub async fn add_participant(
        &self,
        engagement_id: &EngagementId,
        user_id: UserId,
        roles: Vec<RoleId>,
    ) -> Result<Engagement, DomainError> {
        if roles.is_empty() {
            return Err(DomainError::invalid_field(
                "roles",
                "a participant requires at least one role",
            ));
        }
        for role in &roles {
            if self.catalog.engagement_role(role).is_none() {
                return Err(DomainError::not_found("role", role));
            }
        }

        let mut user = self.store.find_user(&user_id).await?;
        let mut engagement = self.store.find_engagement(engagement_id).await?;
        if engagement.has_participant(&user_id) {
            return Err(DomainError::duplicate("participants", user_id));
        }
        engagement.participants.push(Participant {
            user_id,
            roles: roles.clone(),
        });
        let updated = self.store.update_engagement(engagement).await?;

        user.engagements.push(EngagementParticipation {
            engagement_id: engagement_id.clone(),
            roles,
            controls: Vec::new(),
            active: true,
        });
        // Roster and mirror are two writes; undo the roster entry if the
        // mirror is rejected so the records stay in step.
        if let Err(err) = self.store.update_user(user).await {
            if let Ok(mut roster) = self.store.find_engagement(engagement_id).await {
                roster.participants.retain(|p| p.user_id != user_id);
                if let Err(undo) = self.store.update_engagement(roster).await {
                    tracing::warn!(
                        engagement = %engagement_id,
                        user = %user_id,
                        error = %undo,
                        "roster undo failed after mirror rejection"
                    );
                }
            }
            return Err(err);
        }
        tracing::info!(engagement = %engagement_id, user = %user_id, "participant added");
        Ok(updated)
    }

    /// Transition an engagement's scheduling status.
    pub async fn transition_status(
        &self,
        id: &EngagementId,
        to: EngagementStatus,
    ) -> Result<Engagement, DomainError> {
        self.store.update_engagement_status(id, to).await
    }

    /// Move an engagement's stage forward.
    pub async fn advance_stage(
        &self,
        id: &EngagementId,
        to: EngagementStage,
    ) -> Result<Engagement, DomainError> {
        self.store.update_engagement_stage(id, to).await
    }

    /// Replace the timeline, re-validating chronological order.
    pub async fn set_timeline(
        &self,
        id: &EngagementId,
        timeline: Timeline,
    ) -> Result<Engagement, DomainError> {
        let mut engagement = self.store.find_engagement(id).await?;
        engagement.timeline = timeline;
        self.store.update_engagement(engagement).await
    }

    /// Fetch one engagement.
    pub async fn get_engagement(&self, id: &EngagementId) -> Result<Engagement, DomainError> {
        self.store.find_engagement(id).await
    }

    /// All engagements for one organization.
    pub async fn list_engagements(&self, organization: &OrgId) -> Vec<Engagement> {
        self.store.find_engagements_by_org(organization).await
    }

    // ─── Control-profile workflow ───────────────────────────────────────

    /// Open an assessment profile for one requirement.
    pub async fn open_control(
        &self,
        engagement_id: &EngagementId,
        control_id: ControlId,
    ) -> Result<EngagementControlProfile, DomainError> {
        self.store.find_engagement(engagement_id).await?;
        let profile = EngagementControlProfile::open(engagement_id.clone(), control_id);
        self.store.create_control_profile(profile).await
    }

    /// Attach evidence and move the profile to `responded`. One store
    /// write: a rejected transition attaches nothing.
    pub async fn submit_response(
        &self,
        engagement_id: &EngagementId,
        control_id: &ControlId,
        evidence: Evidence,
    ) -> Result<EngagementControlProfile, DomainError> {
        self.store
            .respond_with_evidence(engagement_id, control_id, evidence)
            .await
    }

    /// Take a responded profile under review.
    pub async fn begin_review(
        &self,
        engagement_id: &EngagementId,
        control_id: &ControlId,
    ) -> Result<EngagementControlProfile, DomainError> {
        self.store
            .update_control_status(engagement_id, control_id, ControlStatus::UnderReview)
            .await
    }

    /// Send a profile back to the customer with a note. One store
    /// write: an invalid note leaves the status in place.
    pub async fn request_action(
        &self,
        engagement_id: &EngagementId,
        control_id: &ControlId,
        note: ControlNote,
    ) -> Result<EngagementControlProfile, DomainError> {
        self.store
            .request_action_with_note(engagement_id, control_id, note)
            .await
    }

    /// Close out a profile.
    pub async fn complete_control(
        &self,
        engagement_id: &EngagementId,
        control_id: &ControlId,
    ) -> Result<EngagementControlProfile, DomainError> {
        self.store
            .update_control_status(engagement_id, control_id, ControlStatus::Complete)
            .await
    }

    /// All profiles for an engagement.
    pub async fn list_controls(
        &self,
        engagement_id: &EngagementId,
    ) -> Vec<EngagementControlProfile> {
        self.store
            .find_control_profiles_by_engagement(engagement_id)
            .await
    }
}
