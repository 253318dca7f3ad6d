//! Control-profile persistence operations.
//!
//! The compound key (engagement, control) is unique: one profile per
//! requirement per engagement.

use audex_core::{ControlId, DomainError, EngagementId, Timestamp};
use audex_schema::{ControlNote, EngagementControlProfile, Evidence};
use audex_state::ControlStatus;

use crate::DocumentStore;

impl DocumentStore {
    /// Insert a new control profile. The (engagement, control) pair must
    /// be free.
    pub async fn create_control_profile(
        &self,
        profile: EngagementControlProfile,
    ) -> Result<EngagementControlProfile, DomainError> {
        profile.validate().into_result()?;
        let key = (profile.engagement_id.clone(), profile.control_id.clone());
        let mut controls = self.collections.controls.write().await;
        if controls.contains_key(&key) {
            return Err(DomainError::duplicate(
                "engagement_id,control_id",
                format!("{}/{}", key.0, key.1),
            ));
        }
        controls.insert(key, profile.clone());
        Ok(profile)
    }

    /// Fetch the profile for one (engagement, control) pair.
    pub async fn find_control_profile(
        &self,
        engagement: &EngagementId,
        control: &ControlId,
    ) -> Result<EngagementControlProfile, DomainError> {
        self.collections
            .controls
            .read()
            .await
            .get(&(engagement.clone(), control.clone()))
            .cloned()
            .ok_or_else(|| {
                DomainError::not_found("control profile", format!("{engagement}/{control}"))
            })
    }

    /// All profiles for an engagement.
    pub async fn find_control_profiles_by_engagement(
        &self,
        engagement: &EngagementId,
    ) -> Vec<EngagementControlProfile> {
        self.collections
            .controls
            .read()
            .await
            .values()
            .filter(|p| &p.engagement_id == engagement)
            .cloned()
            .collect()
    }

    /// Transition a profile's workflow status (two-phase, atomic
    /// rejection).
    pub async fn update_control_status(
        &self,
        engagement: &EngagementId,
        control: &ControlId,
        to: ControlStatus,
    ) -> Result<EngagementControlProfile, DomainError> {
        let key = (engagement.clone(), control.clone());
        let mut controls = self.collections.controls.write().await;
        let profile = controls.get_mut(&key).ok_or_else(|| {
            DomainError::not_found("control profile", format!("{engagement}/{control}"))
        })?;
        profile.status.try_transition(to)?;
        profile.status = to;
        profile.updated_at = Timestamp::now();
        tracing::info!(engagement = %engagement, control = %control, status = %to, "control status changed");
        Ok(profile.clone())
    }

    /// Move a profile to `responded` with the evidence item attached,
    /// under one write lock. Transition and evidence are validated
    /// against the persisted record before either is applied, so a
    /// rejection leaves the stored profile untouched.
    pub async fn respond_with_evidence(
        &self,
        engagement: &EngagementId,
        control: &ControlId,
        evidence: Evidence,
    ) -> Result<EngagementControlProfile, DomainError> {
        let key = (engagement.clone(), control.clone());
        let mut controls = self.collections.controls.write().await;
        let profile = controls.get_mut(&key).ok_or_else(|| {
            DomainError::not_found("control profile", format!("{engagement}/{control}"))
        })?;

        profile.status.try_transition(ControlStatus::Responded)?;
        let mut candidate = profile.clone();
        candidate.status = ControlStatus::Responded;
        candidate.evidence.push(evidence);
        candidate.validate().into_result()?;
        candidate.updated_at = Timestamp::now();
        *profile = candidate.clone();
        tracing::info!(engagement = %engagement, control = %control, "control responded");
        Ok(candidate)
    }

    /// Move a profile to `action_required` with the note attached,
    /// under one write lock. Same all-or-nothing contract as
    /// [`DocumentStore::respond_with_evidence`].
    pub async fn request_action_with_note(
        &self,
        engagement: &EngagementId,
        control: &ControlId,
        note: ControlNote,
    ) -> Result<EngagementControlProfile, DomainError> {
        let key = (engagement.clone(), control.clone());
        let mut controls = self.collections.controls.write().await;
        let profile = controls.get_mut(&key).ok_or_else(|| {
            DomainError::not_found("control profile", format!("{engagement}/{control}"))
        })?;

        profile.status.try_transition(ControlStatus::ActionRequired)?;
        let mut candidate = profile.clone();
        candidate.status = ControlStatus::ActionRequired;
        candidate.notes.push(note);
        candidate.validate().into_result()?;
        candidate.updated_at = Timestamp::now();
        *profile = candidate.clone();
        tracing::info!(engagement = %engagement, control = %control, "control action requested");
        Ok(candidate)
    }
}
