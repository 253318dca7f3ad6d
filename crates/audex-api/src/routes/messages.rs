//! # Message Routes
//!
//! Routes:
//! - POST   /v1/messages/{id}/send — send a draft
//! - POST   /v1/messages/{id}/read — record a read receipt
//! - DELETE /v1/messages/{id} — soft delete

use axum::extract::{Path, State};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use audex_core::{MessageId, UserId};
use audex_schema::Message;

use crate::{AppError, AppState};

/// Message lifecycle router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/messages/{id}/send", post(send))
        .route("/v1/messages/{id}/read", post(mark_read))
        .route("/v1/messages/{id}", delete(remove))
}

#[derive(Debug, Deserialize)]
struct ReadRequest {
    reader: Uuid,
}

async fn send(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    Ok(Json(state.core.messaging.send(&MessageId(id)).await?))
}

async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReadRequest>,
) -> Result<Json<Message>, AppError> {
    Ok(Json(
        state
            .core
            .messaging
            .mark_read(&MessageId(id), UserId(request.reader))
            .await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    Ok(Json(state.core.messaging.delete(&MessageId(id)).await?))
}
