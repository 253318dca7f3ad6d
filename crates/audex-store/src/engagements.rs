//! Engagement persistence operations.
//!
//! Status and stage each go through the two-phase transition check.
//! Schema validation uses the availability list and participant ceiling
//! injected via [`crate::StoreConfig`].

use audex_core::{DomainError, EngagementId, OrgId, Timestamp};
use audex_schema::Engagement;
use audex_state::{EngagementStage, EngagementStatus};

use crate::DocumentStore;

impl DocumentStore {
    fn validate_engagement(&self, engagement: &Engagement) -> Result<(), DomainError> {
        engagement
            .validate(
                &self.config.available_frameworks,
                self.config.max_engagement_participants,
            )
            .into_result()
    }

    /// Insert a new engagement. The id must be free.
    pub async fn create_engagement(
        &self,
        engagement: Engagement,
    ) -> Result<Engagement, DomainError> {
        self.validate_engagement(&engagement)?;
        let mut engagements = self.collections.engagements.write().await;
        if engagements.contains_key(&engagement.id) {
            return Err(DomainError::duplicate("id", &engagement.id));
        }
        tracing::debug!(engagement = %engagement.id, "engagement created");
        engagements.insert(engagement.id.clone(), engagement.clone());
        Ok(engagement)
    }

    /// Fetch an engagement by id.
    pub async fn find_engagement(&self, id: &EngagementId) -> Result<Engagement, DomainError> {
        self.collections
            .engagements
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("engagement", id))
    }

    /// All engagements for an organization.
    pub async fn find_engagements_by_org(&self, org: &OrgId) -> Vec<Engagement> {
        self.collections
            .engagements
            .read()
            .await
            .values()
            .filter(|e| &e.organization == org)
            .cloned()
            .collect()
    }

    /// Whether an engagement id is already taken.
    pub async fn engagement_exists(&self, id: &EngagementId) -> bool {
        self.collections.engagements.read().await.contains_key(id)
    }

    /// Transition an engagement's status (two-phase, atomic rejection).
    pub async fn update_engagement_status(
        &self,
        id: &EngagementId,
        to: EngagementStatus,
    ) -> Result<Engagement, DomainError> {
        let mut engagements = self.collections.engagements.write().await;
        let engagement = engagements
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("engagement", id))?;
        engagement.status.try_transition(to)?;
        engagement.status = to;
        if to == EngagementStatus::Closed {
            engagement.timeline.closed_at = Some(Timestamp::now());
        }
        engagement.updated_at = Timestamp::now();
        tracing::info!(engagement = %id, status = %to, "engagement status changed");
        Ok(engagement.clone())
    }

    /// Move an engagement's stage forward (two-phase; staying is a no-op
    /// write, moving backwards is rejected).
    pub async fn update_engagement_stage(
        &self,
        id: &EngagementId,
        to: EngagementStage,
    ) -> Result<Engagement, DomainError> {
        let mut engagements = self.collections.engagements.write().await;
        let engagement = engagements
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("engagement", id))?;
        engagement.stage.try_advance(to)?;
        engagement.stage = to;
        engagement.updated_at = Timestamp::now();
        tracing::info!(engagement = %id, stage = %to, "engagement stage advanced");
        Ok(engagement.clone())
    }

    /// Replace a non-lifecycle portion of the record (timeline, roster,
    /// frameworks) after full schema re-validation. The persisted status
    /// and stage are preserved; lifecycle moves must use the dedicated
    /// transition methods.
    pub async fn update_engagement(
        &self,
        engagement: Engagement,
    ) -> Result<Engagement, DomainError> {
        self.validate_engagement(&engagement)?;
        let mut engagements = self.collections.engagements.write().await;
        let stored = engagements
            .get_mut(&engagement.id)
            .ok_or_else(|| DomainError::not_found("engagement", &engagement.id))?;
        let mut updated = engagement;
        updated.status = stored.status;
        updated.stage = stored.stage;
        updated.updated_at = Timestamp::now();
        *stored = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audex_schema::{EngagementType, FrameworkSelection, Participant};
    use audex_core::{RoleId, UserId};

    fn engagement() -> Engagement {
        Engagement::new(
            EngagementId::new("acme_soc2t2_2603:1").unwrap(),
            OrgId::new("acme").unwrap(),
            EngagementType::Soc2Type2,
            vec![FrameworkSelection {
                name: "soc2".into(),
                components: vec!["security".into()],
            }],
        )
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_framework() {
        let store = DocumentStore::default();
        let mut e = engagement();
        e.frameworks[0].name = "cobit".into();
        assert!(matches!(
            store.create_engagement(e).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_active_to_pending_rejected_and_unchanged() {
        let store = DocumentStore::default();
        let id = store.create_engagement(engagement()).await.unwrap().id;
        store
            .update_engagement_status(&id, EngagementStatus::Scheduled)
            .await
            .unwrap();
        store
            .update_engagement_status(&id, EngagementStatus::Active)
            .await
            .unwrap();

        let err = store
            .update_engagement_status(&id, EngagementStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StateTransition(_)));
        assert_eq!(
            store.find_engagement(&id).await.unwrap().status,
            EngagementStatus::Active
        );

        // active -> extended is legal.
        store
            .update_engagement_status(&id, EngagementStatus::Extended)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_closing_stamps_the_timeline() {
        let store = DocumentStore::default();
        let id = store.create_engagement(engagement()).await.unwrap().id;
        let closed = store
            .update_engagement_status(&id, EngagementStatus::Closed)
            .await
            .unwrap();
        assert!(closed.timeline.closed_at.is_some());
    }

    #[tokio::test]
    async fn test_stage_never_goes_back() {
        let store = DocumentStore::default();
        let id = store.create_engagement(engagement()).await.unwrap().id;
        store
            .update_engagement_stage(&id, EngagementStage::Fieldwork)
            .await
            .unwrap();
        // Staying put is allowed.
        store
            .update_engagement_stage(&id, EngagementStage::Fieldwork)
            .await
            .unwrap();
        let err = store
            .update_engagement_stage(&id, EngagementStage::Onboarding)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StateTransition(_)));
        assert_eq!(
            store.find_engagement(&id).await.unwrap().stage,
            EngagementStage::Fieldwork
        );
    }

    #[tokio::test]
    async fn test_update_preserves_lifecycle_fields() {
        let store = DocumentStore::default();
        let id = store.create_engagement(engagement()).await.unwrap().id;
        store
            .update_engagement_status(&id, EngagementStatus::Scheduled)
            .await
            .unwrap();

        let mut patch = store.find_engagement(&id).await.unwrap();
        patch.status = EngagementStatus::Pending; // must not take effect
        patch.participants.push(Participant {
            user_id: UserId::new(),
            roles: vec![RoleId::new("engagement_sme").unwrap()],
        });
        let updated = store.update_engagement(patch).await.unwrap();
        assert_eq!(updated.status, EngagementStatus::Scheduled);
        assert_eq!(updated.participants.len(), 1);
    }

    #[tokio::test]
    async fn test_participant_ceiling_from_config() {
        let mut config = crate::StoreConfig::default();
        config.max_engagement_participants = 1;
        let store = DocumentStore::new(config);
        let id = store.create_engagement(engagement()).await.unwrap().id;

        let mut patch = store.find_engagement(&id).await.unwrap();
        for _ in 0..2 {
            patch.participants.push(Participant {
                user_id: UserId::new(),
                roles: vec![RoleId::new("engagement_sme").unwrap()],
            });
        }
        assert!(store.update_engagement(patch).await.is_err());
    }
}
