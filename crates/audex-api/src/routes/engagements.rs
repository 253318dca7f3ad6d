//! # Engagement Routes
//!
//! Routes:
//! - POST /v1/engagements — create for an organization
//! - GET  /v1/engagements/{id} — fetch one
//! - PUT  /v1/engagements/{id}/status — scheduling transition
//! - PUT  /v1/engagements/{id}/stage — forward-only stage move
//! - PUT  /v1/engagements/{id}/timeline — replace the timeline
//! - POST /v1/engagements/{id}/participants — roster a user
//! - POST /v1/engagements/{id}/controls — open a control profile
//! - GET  /v1/engagements/{id}/controls — list profiles
//! - POST /v1/engagements/{id}/controls/{control_id}/respond — evidence + responded
//! - POST /v1/engagements/{id}/controls/{control_id}/review — under review
//! - POST /v1/engagements/{id}/controls/{control_id}/request-action — bounce with a note
//! - POST /v1/engagements/{id}/controls/{control_id}/complete — close out
//! - POST /v1/engagements/{id}/messages — draft a message
//! - GET  /v1/engagements/{id}/messages — thread listing

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use audex_core::{ControlId, EngagementId, MessageId, OrgId, RoleId, Timestamp, UserId};
use audex_schema::{
    ControlNote, Engagement, EngagementControlProfile, EngagementType, Evidence,
    FrameworkSelection, Message, NoteVisibility, Timeline,
};
use audex_state::{EngagementStage, EngagementStatus};

use crate::{AppError, AppState};

/// Engagement router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/engagements", post(create))
        .route("/v1/engagements/{id}", get(show))
        .route("/v1/engagements/{id}/status", put(set_status))
        .route("/v1/engagements/{id}/stage", put(set_stage))
        .route("/v1/engagements/{id}/timeline", put(set_timeline))
        .route("/v1/engagements/{id}/participants", post(add_participant))
        .route("/v1/engagements/{id}/controls", post(open_control).get(list_controls))
        .route(
            "/v1/engagements/{id}/controls/{control_id}/respond",
            post(respond),
        )
        .route(
            "/v1/engagements/{id}/controls/{control_id}/review",
            post(review),
        )
        .route(
            "/v1/engagements/{id}/controls/{control_id}/request-action",
            post(request_action),
        )
        .route(
            "/v1/engagements/{id}/controls/{control_id}/complete",
            post(complete),
        )
        .route(
            "/v1/engagements/{id}/messages",
            post(post_message).get(list_messages),
        )
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    organization: String,
    engagement_type: EngagementType,
    period: String,
    frameworks: Vec<FrameworkSelection>,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: EngagementStatus,
}

#[derive(Debug, Deserialize)]
struct StageRequest {
    stage: EngagementStage,
}

#[derive(Debug, Deserialize)]
struct ParticipantRequest {
    user_id: Uuid,
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OpenControlRequest {
    control_id: String,
}

#[derive(Debug, Deserialize)]
struct NoteRequest {
    author: Uuid,
    body: String,
    visibility: NoteVisibility,
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    author: Uuid,
    body: String,
    control_id: Option<String>,
    reply_to: Option<Uuid>,
}

async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Engagement>), AppError> {
    let org = OrgId::new(request.organization)?;
    let engagement = state
        .core
        .engagements
        .create_engagement(
            &org,
            request.engagement_type,
            &request.period,
            request.frameworks,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(engagement)))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Engagement>, AppError> {
    let id = EngagementId::new(id)?;
    Ok(Json(state.core.engagements.get_engagement(&id).await?))
}

async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Engagement>, AppError> {
    let id = EngagementId::new(id)?;
    Ok(Json(
        state
            .core
            .engagements
            .transition_status(&id, request.status)
            .await?,
    ))
}

async fn set_stage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StageRequest>,
) -> Result<Json<Engagement>, AppError> {
    let id = EngagementId::new(id)?;
    Ok(Json(
        state
            .core
            .engagements
            .advance_stage(&id, request.stage)
            .await?,
    ))
}

async fn set_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(timeline): Json<Timeline>,
) -> Result<Json<Engagement>, AppError> {
    let id = EngagementId::new(id)?;
    Ok(Json(state.core.engagements.set_timeline(&id, timeline).await?))
}

async fn add_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ParticipantRequest>,
) -> Result<Json<Engagement>, AppError> {
    let id = EngagementId::new(id)?;
    let roles = request
        .roles
        .into_iter()
        .map(RoleId::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(
        state
            .core
            .engagements
            .add_participant(&id, UserId(request.user_id), roles)
            .await?,
    ))
}

async fn open_control(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<OpenControlRequest>,
) -> Result<(StatusCode, Json<EngagementControlProfile>), AppError> {
    let id = EngagementId::new(id)?;
    let control = ControlId::new(request.control_id)?;
    let profile = state.core.engagements.open_control(&id, control).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn list_controls(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EngagementControlProfile>>, AppError> {
    let id = EngagementId::new(id)?;
    Ok(Json(state.core.engagements.list_controls(&id).await))
}

async fn respond(
    State(state): State<AppState>,
    Path((id, control_id)): Path<(String, String)>,
    Json(evidence): Json<Evidence>,
) -> Result<Json<EngagementControlProfile>, AppError> {
    let id = EngagementId::new(id)?;
    let control = ControlId::new(control_id)?;
    Ok(Json(
        state
            .core
            .engagements
            .submit_response(&id, &control, evidence)
            .await?,
    ))
}

async fn review(
    State(state): State<AppState>,
    Path((id, control_id)): Path<(String, String)>,
) -> Result<Json<EngagementControlProfile>, AppError> {
    let id = EngagementId::new(id)?;
    let control = ControlId::new(control_id)?;
    Ok(Json(state.core.engagements.begin_review(&id, &control).await?))
}

async fn request_action(
    State(state): State<AppState>,
    Path((id, control_id)): Path<(String, String)>,
    Json(request): Json<NoteRequest>,
) -> Result<Json<EngagementControlProfile>, AppError> {
    let id = EngagementId::new(id)?;
    let control = ControlId::new(control_id)?;
    let note = ControlNote {
        author: UserId(request.author),
        body: request.body,
        visibility: request.visibility,
        created_at: Timestamp::now(),
    };
    Ok(Json(
        state
            .core
            .engagements
            .request_action(&id, &control, note)
            .await?,
    ))
}

async fn complete(
    State(state): State<AppState>,
    Path((id, control_id)): Path<(String, String)>,
) -> Result<Json<EngagementControlProfile>, AppError> {
    let id = EngagementId::new(id)?;
    let control = ControlId::new(control_id)?;
    Ok(Json(
        state.core.engagements.complete_control(&id, &control).await?,
    ))
}

async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let id = EngagementId::new(id)?;
    let control_id = request.control_id.map(ControlId::new).transpose()?;
    let message = state
        .core
        .messaging
        .post_draft(
            &id,
            UserId(request.author),
            request.body,
            control_id,
            request.reply_to.map(MessageId),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let id = EngagementId::new(id)?;
    Ok(Json(state.core.messaging.thread(&id).await))
}
