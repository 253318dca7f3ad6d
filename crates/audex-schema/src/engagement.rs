//! # Engagement Entity
//!
//! An audit engagement: one framework assessment cycle for one
//! organization. Carries the status and stage lifecycles from
//! `audex-state`, a chronologically consistent timeline, the selected
//! frameworks, and the participant roster.

use serde::{Deserialize, Serialize};

use audex_core::{validate, EngagementId, OrgId, RoleId, Timestamp, UserId, ValidationErrors};
use audex_state::{EngagementStage, EngagementStatus};

/// Minimum framework selections per engagement.
pub const MIN_FRAMEWORKS: usize = 1;
/// Maximum framework selections per engagement.
pub const MAX_FRAMEWORKS: usize = 10;

/// The SOC 2 trust-services components a selection may name.
pub const SOC2_COMPONENTS: [&str; 5] = [
    "security",
    "availability",
    "processing_integrity",
    "confidentiality",
    "privacy",
];

/// The closed set of engagement types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    /// SOC 2 Type I point-in-time assessment.
    Soc2Type1,
    /// SOC 2 Type II period-of-time assessment.
    Soc2Type2,
    /// ISO 27001 certification audit.
    Iso27001,
    /// HIPAA security-rule gap assessment.
    HipaaGap,
    /// PCI DSS assessment.
    PciDss,
    /// Internal readiness review.
    InternalAudit,
}

impl EngagementType {
    /// Short code used inside engagement identifiers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Soc2Type1 => "soc2t1",
            Self::Soc2Type2 => "soc2t2",
            Self::Iso27001 => "iso27001",
            Self::HipaaGap => "hipaa",
            Self::PciDss => "pcidss",
            Self::InternalAudit => "internal",
        }
    }
}

/// A framework chosen for an engagement, with optional sub-components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSelection {
    /// Framework name; must appear in the configured availability list.
    pub name: String,
    /// Sub-components in scope. For SOC 2 frameworks these are limited
    /// to the trust-services components.
    pub components: Vec<String>,
}

/// Engagement timeline. Optional dates must be chronologically
/// consistent in the order declared here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Agreed start of the engagement.
    pub scheduled_start: Option<Timestamp>,
    /// Start of fieldwork.
    pub fieldwork_start: Option<Timestamp>,
    /// End of fieldwork.
    pub fieldwork_end: Option<Timestamp>,
    /// Deliverable due date.
    pub report_due: Option<Timestamp>,
    /// When the engagement was closed.
    pub closed_at: Option<Timestamp>,
}

impl Timeline {
    /// The timeline dates in their required chronological order.
    fn ordered(&self) -> [Option<Timestamp>; 5] {
        [
            self.scheduled_start,
            self.fieldwork_start,
            self.fieldwork_end,
            self.report_due,
            self.closed_at,
        ]
    }
}

/// A roster entry: one user with at least one engagement role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// The participating user.
    pub user_id: UserId,
    /// Engagement roles held; never empty.
    pub roles: Vec<RoleId>,
}

/// An audit engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engagement {
    /// Identifier of the form `org_type_yymm:v`.
    pub id: EngagementId,
    /// The audited organization.
    pub organization: OrgId,
    /// Engagement type.
    pub engagement_type: EngagementType,
    /// Selected frameworks (1–10).
    pub frameworks: Vec<FrameworkSelection>,
    /// Scheduling lifecycle status.
    pub status: EngagementStatus,
    /// Fieldwork stage; only ever moves forward.
    pub stage: EngagementStage,
    /// Timeline dates.
    pub timeline: Timeline,
    /// Participant roster.
    pub participants: Vec<Participant>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last modified.
    pub updated_at: Timestamp,
}

impl Engagement {
    /// Create a pending engagement at the onboarding stage.
    pub fn new(
        id: EngagementId,
        organization: OrgId,
        engagement_type: EngagementType,
        frameworks: Vec<FrameworkSelection>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            organization,
            engagement_type,
            frameworks,
            status: EngagementStatus::Pending,
            stage: EngagementStage::Onboarding,
            timeline: Timeline::default(),
            participants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a user is on the roster.
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| &p.user_id == user_id)
    }

    /// Check every structural constraint, collecting all failures.
    ///
    /// `available_frameworks` is the injected availability list;
    /// `max_participants` is the configured roster ceiling.
    pub fn validate(
        &self,
        available_frameworks: &[String],
        max_participants: usize,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if !validate::within_bounds(&self.frameworks, MIN_FRAMEWORKS, MAX_FRAMEWORKS) {
            errors.push(
                "frameworks",
                format!("between {MIN_FRAMEWORKS} and {MAX_FRAMEWORKS} frameworks required"),
            );
        }
        for selection in &self.frameworks {
            if !available_frameworks.contains(&selection.name) {
                errors.push(
                    "frameworks",
                    format!("framework not available: {:?}", selection.name),
                );
            }
            if is_soc2(&selection.name) {
                for component in &selection.components {
                    if !SOC2_COMPONENTS.contains(&component.as_str()) {
                        errors.push(
                            "frameworks",
                            format!(
                                "invalid SOC 2 component {:?} for {:?}",
                                component, selection.name
                            ),
                        );
                    }
                }
            }
        }

        if !validate::is_chronological(&self.timeline.ordered()) {
            errors.push("timeline", "timeline dates are out of order");
        }

        if self.participants.len() > max_participants {
            errors.push(
                "participants",
                format!("at most {max_participants} participants allowed"),
            );
        }
        for participant in &self.participants {
            if participant.roles.is_empty() {
                errors.push(
                    "participants",
                    format!("participant {} requires at least one role", participant.user_id),
                );
            }
        }
        let mut seen = std::collections::HashSet::new();
        for participant in &self.participants {
            if !seen.insert(participant.user_id) {
                errors.push(
                    "participants",
                    format!("duplicate participant: {}", participant.user_id),
                );
            }
        }

        errors
    }
}

fn is_soc2(framework: &str) -> bool {
    framework.to_ascii_lowercase().starts_with("soc2")
}
