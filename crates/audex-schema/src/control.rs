//! # Engagement Control Profile
//!
//! One assessment record per (engagement, requirement) pair — the unit
//! of evidence collection. The store enforces the compound-unique key;
//! this module owns the structural rules for evidence and notes.

use serde::{Deserialize, Serialize};

use audex_core::{validate, ControlId, EngagementId, Timestamp, UserId, ValidationErrors};
use audex_state::ControlStatus;

/// An evidence item attached to a control profile.
///
/// The variant determines which fields are required: files need a name
/// and content type, links need a well-formed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evidence {
    /// An uploaded file.
    File {
        /// Original file name.
        name: String,
        /// Size in bytes.
        size_bytes: u64,
        /// MIME content type.
        content_type: String,
    },
    /// A link to externally hosted evidence.
    Link {
        /// Target URL.
        url: String,
        /// What the link shows.
        description: String,
    },
}

impl Evidence {
    fn validate_into(&self, errors: &mut ValidationErrors) {
        match self {
            Self::File {
                name,
                content_type,
                ..
            } => {
                if name.trim().is_empty() {
                    errors.push("evidence", "file evidence requires a name");
                }
                if content_type.trim().is_empty() {
                    errors.push("evidence", "file evidence requires a content type");
                }
            }
            Self::Link { url, .. } => {
                if !validate::is_valid_url(url) {
                    errors.push("evidence", format!("invalid evidence URL: {url:?}"));
                }
            }
        }
    }
}

/// Note visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteVisibility {
    /// Visible to the audit team only.
    Private,
    /// Visible to all engagement participants.
    Public,
}

/// A note on a control profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlNote {
    /// Who wrote the note.
    pub author: UserId,
    /// Note body.
    pub body: String,
    /// Who may read it.
    pub visibility: NoteVisibility,
    /// When it was written.
    pub created_at: Timestamp,
}

/// The assessment record for one control within one engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementControlProfile {
    /// The engagement; with `control_id` forms the compound-unique key.
    pub engagement_id: EngagementId,
    /// The framework requirement being assessed.
    pub control_id: ControlId,
    /// Workflow status.
    pub status: ControlStatus,
    /// Evidence items.
    pub evidence: Vec<Evidence>,
    /// Private and public notes.
    pub notes: Vec<ControlNote>,
    /// References to submissions from prior engagements.
    pub prior_submissions: Vec<EngagementId>,
    /// When the record was last modified.
    pub updated_at: Timestamp,
}

impl EngagementControlProfile {
    /// Open a fresh profile with no evidence.
    pub fn open(engagement_id: EngagementId, control_id: ControlId) -> Self {
        Self {
            engagement_id,
            control_id,
            status: ControlStatus::Open,
            evidence: Vec::new(),
            notes: Vec::new(),
            prior_submissions: Vec::new(),
            updated_at: Timestamp::now(),
        }
    }

    /// Notes visible to a non-auditor participant.
    pub fn public_notes(&self) -> impl Iterator<Item = &ControlNote> {
        self.notes
            .iter()
            .filter(|n| n.visibility == NoteVisibility::Public)
    }

    /// Check every structural constraint, collecting all failures.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for item in &self.evidence {
            item.validate_into(&mut errors);
        }
        for note in &self.notes {
            if note.body.trim().is_empty() {
                errors.push("notes", "note body must not be empty");
            }
        }
        errors
    }
}
