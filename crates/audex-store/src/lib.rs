//! # audex-store — Persistence Manager
//!
//! The single choke point for document access. Domain managers never
//! touch collections directly; every read and write flows through
//! [`DocumentStore`], which owns the backing collections and translates
//! storage-level faults into the domain error taxonomy:
//!
//! - unique-key collisions → `DomainError::DuplicateField { field, value }`
//! - schema rejections → `DomainError::Validation { field_errors }`
//! - everything else → `DomainError::Storage`
//!
//! ## Two-phase transition writes
//!
//! Status and stage updates are an explicit two-phase operation: the
//! store re-reads the persisted record, validates the proposed transition
//! against that prior value in application code, and only then writes.
//! Rejection is atomic — no field of the stored record changes. Two
//! concurrent updates can both read the same prior state and both pass
//! validation; the second write wins. There is no optimistic-concurrency
//! token, and callers must not assume one.
//!
//! ## Backing storage
//!
//! Collections are in-memory maps behind `tokio::sync::RwLock`. The
//! document-database driver sits outside this crate's contract; the
//! store reports its own lifecycle through [`health::HealthReport`].
//! No write is ever retried automatically.

pub mod assignments;
pub mod controls;
pub mod engagements;
pub mod health;
pub mod messages;
pub mod organizations;
pub mod users;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use audex_core::{AssignmentId, ControlId, EngagementId, MessageId, OrgId, UserId};
use audex_schema::{
    Engagement, EngagementControlProfile, Message, Organization, RoleAssignment, User,
};

pub use health::HealthReport;

/// Validation limits injected at construction.
///
/// Engagement validation needs the framework availability list and the
/// participant ceiling; both are deployment configuration, so the store
/// receives them once instead of reading them inside validators.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Frameworks engagements may select.
    pub available_frameworks: Vec<String>,
    /// Maximum participants per engagement.
    pub max_engagement_participants: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            available_frameworks: vec![
                "soc2".to_string(),
                "iso27001".to_string(),
                "hipaa".to_string(),
                "pcidss".to_string(),
            ],
            max_engagement_participants: 25,
        }
    }
}

pub(crate) struct Collections {
    pub(crate) organizations: RwLock<HashMap<OrgId, Organization>>,
    pub(crate) users: RwLock<HashMap<UserId, User>>,
    pub(crate) engagements: RwLock<HashMap<EngagementId, Engagement>>,
    pub(crate) controls: RwLock<HashMap<(EngagementId, ControlId), EngagementControlProfile>>,
    pub(crate) assignments: RwLock<HashMap<AssignmentId, RoleAssignment>>,
    pub(crate) messages: RwLock<HashMap<MessageId, Message>>,
}

/// The persistence manager. Cheap to clone; clones share the same
/// backing collections.
#[derive(Clone)]
pub struct DocumentStore {
    pub(crate) collections: Arc<Collections>,
    pub(crate) config: Arc<StoreConfig>,
    pub(crate) initialized: Arc<AtomicBool>,
    pub(crate) connected: Arc<AtomicBool>,
}

impl DocumentStore {
    /// Create a connected, initialized store with empty collections.
    pub fn new(config: StoreConfig) -> Self {
        tracing::info!(
            frameworks = config.available_frameworks.len(),
            "document store initialized"
        );
        Self {
            collections: Arc::new(Collections {
                organizations: RwLock::new(HashMap::new()),
                users: RwLock::new(HashMap::new()),
                engagements: RwLock::new(HashMap::new()),
                controls: RwLock::new(HashMap::new()),
                assignments: RwLock::new(HashMap::new()),
                messages: RwLock::new(HashMap::new()),
            }),
            config: Arc::new(config),
            initialized: Arc::new(AtomicBool::new(true)),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The injected validation limits.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Mark the backing connection lost (used by shutdown and tests).
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        tracing::warn!("document store disconnected");
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("initialized", &self.initialized.load(Ordering::SeqCst))
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
