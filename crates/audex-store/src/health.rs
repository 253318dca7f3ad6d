//! Store health probe.

use serde::{Deserialize, Serialize};

use crate::DocumentStore;

/// A point-in-time health report for the persistence manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `ok` when initialized and connected, `degraded` otherwise.
    pub status: String,
    /// Whether initialization completed.
    pub initialized: bool,
    /// Whether the backing connection is up.
    pub connected: bool,
    /// The backing store's own state word.
    pub backing_store_state: String,
}

impl DocumentStore {
    /// Report the store's lifecycle state.
    pub async fn health_check(&self) -> HealthReport {
        let initialized = self
            .initialized
            .load(std::sync::atomic::Ordering::SeqCst);
        let connected = self.is_connected();
        HealthReport {
            status: if initialized && connected {
                "ok".to_string()
            } else {
                "degraded".to_string()
            },
            initialized,
            connected,
            backing_store_state: if connected {
                "connected".to_string()
            } else {
                "disconnected".to_string()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_healthy_store() {
        let store = DocumentStore::default();
        let report = store.health_check().await;
        assert_eq!(report.status, "ok");
        assert!(report.initialized);
        assert!(report.connected);
        assert_eq!(report.backing_store_state, "connected");
    }

    #[tokio::test]
    async fn test_disconnected_store_is_degraded() {
        let store = DocumentStore::default();
        store.disconnect();
        let report = store.health_check().await;
        assert_eq!(report.status, "degraded");
        assert_eq!(report.backing_store_state, "disconnected");
    }
}
