//! # Application State
//!
//! Shared state for the Axum application: one assembled domain core
//! behind an `Arc`, cloned per handler invocation.

use std::sync::Arc;

use audex_domain::{AudexConfig, AuditCore};

use crate::error::AppError;

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The assembled domain core.
    pub core: Arc<AuditCore>,
}

impl AppState {
    /// Wrap an already-assembled core.
    pub fn new(core: AuditCore) -> Self {
        Self {
            core: Arc::new(core),
        }
    }

    /// Assemble a core from configuration.
    pub fn from_config(config: AudexConfig) -> Result<Self, AppError> {
        Ok(Self::new(AuditCore::new(config)?))
    }
}
