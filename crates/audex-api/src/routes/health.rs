//! # Health Probe
//!
//! Routes:
//! - GET /v1/health — store lifecycle report (unauthenticated)

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use audex_store::HealthReport;

use crate::AppState;

/// Health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.core.health_check().await)
}
