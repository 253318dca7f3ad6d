//! # Message Entity
//!
//! Engagement- and control-scoped messages with mention extraction and
//! optional threading. Lifecycle rules live in `audex-state`.

use serde::{Deserialize, Serialize};

use audex_core::{ControlId, EngagementId, MessageId, Timestamp, UserId, ValidationErrors};
use audex_state::MessageLifecycle;

/// A message posted within an engagement, optionally scoped to one
/// control profile and optionally threaded under a parent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Record identifier.
    pub id: MessageId,
    /// The engagement this message belongs to.
    pub engagement_id: EngagementId,
    /// Narrower control scope, if any.
    pub control_id: Option<ControlId>,
    /// Author.
    pub author: UserId,
    /// Body text.
    pub body: String,
    /// Lifecycle state.
    pub lifecycle: MessageLifecycle,
    /// Handles mentioned in the body, extracted at creation.
    pub mentions: Vec<String>,
    /// Parent message when this is a threaded reply.
    pub thread_parent: Option<MessageId>,
    /// Users who have read the message.
    pub read_by: Vec<UserId>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the message left draft, if it has.
    pub sent_at: Option<Timestamp>,
}

impl Message {
    /// Compose a draft. Mentions are extracted from the body.
    pub fn draft(engagement_id: EngagementId, author: UserId, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            id: MessageId::new(),
            engagement_id,
            control_id: None,
            author,
            mentions: extract_mentions(&body),
            body,
            lifecycle: MessageLifecycle::Draft,
            thread_parent: None,
            read_by: Vec::new(),
            created_at: Timestamp::now(),
            sent_at: None,
        }
    }

    /// Scope to a control profile.
    pub fn on_control(mut self, control_id: ControlId) -> Self {
        self.control_id = Some(control_id);
        self
    }

    /// Thread under a parent message.
    pub fn in_reply_to(mut self, parent: MessageId) -> Self {
        self.thread_parent = Some(parent);
        self
    }

    /// Check structural constraints.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.body.trim().is_empty() {
            errors.push("body", "message body must not be empty");
        }
        if self.thread_parent == Some(self.id) {
            errors.push("thread_parent", "a message cannot reply to itself");
        }
        errors
    }
}

/// Extract `@handle` mentions from a message body.
///
/// A handle starts with `@` at a word boundary and continues through
/// alphanumerics, dots, hyphens, and underscores. Duplicates are
/// collapsed, order of first appearance preserved.
pub fn extract_mentions(body: &str) -> Vec<String> {
    let mut mentions = Vec::new();
    let bytes = body.as_bytes();
    for (i, _) in body.match_indices('@') {
        // Word boundary: start of text or a non-handle character before.
        if i > 0 {
            let prev = bytes[i - 1] as char;
            if prev.is_ascii_alphanumeric() || prev == '@' {
                continue;
            }
        }
        let handle: String = body[i + 1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();
        let handle = handle.trim_end_matches('.').to_string();
        if !handle.is_empty() && !mentions.contains(&handle) {
            mentions.push(handle);
        }
    }
    mentions
}
