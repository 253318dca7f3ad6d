//! # Messaging Manager
//!
//! Engagement-scoped messaging: drafting, sending, read receipts, soft
//! deletion, and thread listing. Mention extraction happens at draft
//! time in the schema; lifecycle legality is enforced by the store.

use audex_core::{ControlId, DomainError, EngagementId, MessageId, UserId};
use audex_schema::Message;
use audex_state::MessageLifecycle;
use audex_store::DocumentStore;

/// Messaging workflows atop the store.
#[derive(Debug, Clone)]
pub struct MessagingManager {
    store: DocumentStore,
}

impl MessagingManager {
    /// Build a manager over a shared store handle.
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Compose a draft in an engagement, optionally scoped to a control
    /// and threaded under a parent.
    pub async fn post_draft(
        &self,
        engagement_id: &EngagementId,
        author: UserId,
        body: impl Into<String>,
        control_id: Option<ControlId>,
        reply_to: Option<MessageId>,
    ) -> Result<Message, DomainError> {
        self.store.find_engagement(engagement_id).await?;
        self.store.find_user(&author).await?;
        let mut message = Message::draft(engagement_id.clone(), author, body);
        if let Some(control_id) = control_id {
            message = message.on_control(control_id);
        }
        if let Some(parent) = reply_to {
            message = message.in_reply_to(parent);
        }
        self.store.create_message(message).await
    }

    /// Send a draft.
    pub async fn send(&self, id: &MessageId) -> Result<Message, DomainError> {
        self.store
            .update_message_lifecycle(id, MessageLifecycle::Sent, None)
            .await
    }

    /// Record that `reader` has read a sent message.
    pub async fn mark_read(
        &self,
        id: &MessageId,
        reader: UserId,
    ) -> Result<Message, DomainError> {
        self.store
            .update_message_lifecycle(id, MessageLifecycle::Read, Some(reader))
            .await
    }

    /// Soft-delete a message. It disappears from listings but the record
    /// survives.
    pub async fn delete(&self, id: &MessageId) -> Result<Message, DomainError> {
        self.store
            .update_message_lifecycle(id, MessageLifecycle::Deleted, None)
            .await
    }

    /// Non-deleted messages for an engagement, oldest first.
    pub async fn thread(&self, engagement_id: &EngagementId) -> Vec<Message> {
        self.store.find_messages_by_engagement(engagement_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audex_schema::{EngagementType, FrameworkSelection, User};

    async fn setup() -> (DocumentStore, MessagingManager, EngagementId, UserId) {
        let store = DocumentStore::default();
        let org = crate::organization::OrganizationManager::new(store.clone())
            .create_organization(crate::organization::CreateOrganization {
                name: "Acme".into(),
                requested_id: None,
                org_domains: vec![],
            })
            .await
            .unwrap();
        let engagement = crate::engagement::EngagementManager::new(
            store.clone(),
            audex_roles::RoleCatalog::standard(),
        )
        .create_engagement(
            &org.id,
            EngagementType::Soc2Type2,
            "2603",
            vec![FrameworkSelection {
                name: "soc2".into(),
                components: vec![],
            }],
        )
        .await
        .unwrap();
        let user = store
            .create_user(User::new("sam@acme.com", "Sam", "Lee"))
            .await
            .unwrap();
        (store.clone(), MessagingManager::new(store), engagement.id, user.user_id)
    }

    #[tokio::test]
    async fn test_draft_send_read_flow() {
        let (store, m, engagement, author) = setup().await;
        let draft = m
            .post_draft(&engagement, author, "please upload @priya", None, None)
            .await
            .unwrap();
        assert_eq!(draft.mentions, vec!["priya"]);

        let sent = m.send(&draft.id).await.unwrap();
        assert!(sent.sent_at.is_some());

        let reader = store
            .create_user(User::new("priya@acme.com", "Priya", "N"))
            .await
            .unwrap();
        let read = m.mark_read(&draft.id, reader.user_id).await.unwrap();
        assert_eq!(read.read_by, vec![reader.user_id]);
    }

    #[tokio::test]
    async fn test_draft_requires_engagement_and_author() {
        let (_, m, engagement, author) = setup().await;
        let ghost = EngagementId::new("ghost_soc2t2_2603:1").unwrap();
        assert!(m.post_draft(&ghost, author, "hi", None, None).await.is_err());
        assert!(m
            .post_draft(&engagement, UserId::new(), "hi", None, None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_threading_and_control_scope() {
        let (_, m, engagement, author) = setup().await;
        let parent = m
            .post_draft(&engagement, author, "parent", None, None)
            .await
            .unwrap();
        let reply = m
            .post_draft(
                &engagement,
                author,
                "reply",
                Some(ControlId::new("CC6.1").unwrap()),
                Some(parent.id),
            )
            .await
            .unwrap();
        assert_eq!(reply.thread_parent, Some(parent.id));
        assert!(reply.control_id.is_some());
    }

    #[tokio::test]
    async fn test_deleted_message_leaves_thread() {
        let (_, m, engagement, author) = setup().await;
        let msg = m
            .post_draft(&engagement, author, "oops", None, None)
            .await
            .unwrap();
        m.delete(&msg.id).await.unwrap();
        assert!(m.thread(&engagement).await.is_empty());
        // Deleted is terminal.
        assert!(m.send(&msg.id).await.is_err());
    }
}
