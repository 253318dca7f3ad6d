//! # audex-api — Axum API Surface
//!
//! The HTTP layer over the Audex domain core, built on Axum/Tower/Tokio.
//!
//! ## Routes
//!
//! - `/v1/organizations/*` — onboarding, status, domain claims
//! - `/v1/auth/*`, `/v1/users/*` — login resolution, roles, grants
//! - `/v1/engagements/*` — lifecycle, roster, control profiles, messages
//! - `/v1/frameworks/*` — definitions, assessments, scoring, gap analysis
//! - `/v1/messages/*` — send, read receipts, soft delete
//! - `/v1/health` — liveness probe (unauthenticated)
//!
//! ## Crate Policy
//!
//! - Sits at the top of the dependency DAG below the CLI.
//! - No business logic in route handlers — every handler delegates to a
//!   domain manager and maps the result.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod error;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Assemble the full application router over shared state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::organizations::router())
        .merge(routes::users::router())
        .merge(routes::engagements::router())
        .merge(routes::messages::router())
        .merge(routes::frameworks::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
