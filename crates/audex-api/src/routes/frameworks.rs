//! # Framework Routes
//!
//! Routes:
//! - GET /v1/frameworks/{name} — definition with full control set
//! - GET /v1/frameworks/{name}/score — compliance score
//! - GET /v1/frameworks/{name}/gaps — gap-analysis partition
//! - PUT /v1/frameworks/{name}/controls/{control_id}/assessment — record one

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use audex_core::ControlId;
use audex_domain::{AssessmentState, Framework, GapAnalysis};

use crate::{AppError, AppState};

/// Framework router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/frameworks/{name}", get(show))
        .route("/v1/frameworks/{name}/score", get(score))
        .route("/v1/frameworks/{name}/gaps", get(gaps))
        .route(
            "/v1/frameworks/{name}/controls/{control_id}/assessment",
            put(assess),
        )
}

#[derive(Debug, Deserialize)]
struct AssessRequest {
    assessment: AssessmentState,
}

#[derive(Debug, Serialize)]
struct ScoreResponse {
    framework: String,
    score: f64,
}

async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Framework>, AppError> {
    Ok(Json(state.core.get_framework(&name).await?))
}

async fn score(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ScoreResponse>, AppError> {
    let score = state.core.calculate_compliance_score(&name).await?;
    Ok(Json(ScoreResponse {
        framework: name,
        score,
    }))
}

async fn gaps(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GapAnalysis>, AppError> {
    Ok(Json(state.core.perform_gap_analysis(&name).await?))
}

async fn assess(
    State(state): State<AppState>,
    Path((name, control_id)): Path<(String, String)>,
    Json(request): Json<AssessRequest>,
) -> Result<Json<()>, AppError> {
    let control = ControlId::new(control_id)?;
    state
        .core
        .assess_control(&name, &control, request.assessment)
        .await?;
    Ok(Json(()))
}
