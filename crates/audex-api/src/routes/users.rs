//! # Auth & User Routes
//!
//! Routes:
//! - POST /v1/auth/login — resolve an OAuth callback into a user
//! - GET  /v1/auth/session/{user_id} — deserialize a session token
//! - GET  /v1/users/{id} — fetch one user
//! - PUT  /v1/users/{id}/roles — replace platform roles
//! - POST /v1/users/{id}/assignments — grant a catalog role in a context
//! - POST /v1/users/{id}/permission-check — context-scoped capability check
//!
//! Internal-only user fields (password hash, reset token) never appear in
//! responses; the schema skips them at serialization.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use audex_core::{RoleId, UserId};
use audex_domain::OAuthProfile;
use audex_roles::Permission;
use audex_schema::{AssignmentContext, RoleAssignment, SystemRole, User};

use crate::{AppError, AppState};

/// Auth and user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/session/{user_id}", get(session))
        .route("/v1/users/{id}", get(show))
        .route("/v1/users/{id}/roles", put(set_roles))
        .route("/v1/users/{id}/assignments", post(grant))
        .route("/v1/users/{id}/permission-check", post(permission_check))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    first_name: String,
    last_name: String,
    provider: String,
    subject: String,
}

#[derive(Debug, Deserialize)]
struct RolesRequest {
    roles: Vec<SystemRole>,
}

#[derive(Debug, Deserialize)]
struct GrantRequest {
    role_id: String,
    context: AssignmentContext,
    assigned_by: Uuid,
}

#[derive(Debug, Deserialize)]
struct PermissionCheckRequest {
    permission: String,
    context: Option<AssignmentContext>,
}

#[derive(Debug, Serialize)]
struct PermissionCheckResponse {
    allowed: bool,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .core
        .users
        .resolve_oauth_login(OAuthProfile {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            provider: request.provider,
            subject: request.subject,
        })
        .await?;
    Ok(Json(user))
}

async fn session(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        state.core.users.deserialize_session(UserId(user_id)).await?,
    ))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.core.users.get_user(&UserId(id)).await?))
}

async fn set_roles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RolesRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        state
            .core
            .users
            .assign_system_roles(&UserId(id), request.roles)
            .await?,
    ))
}

async fn grant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GrantRequest>,
) -> Result<(StatusCode, Json<RoleAssignment>), AppError> {
    let role_id = RoleId::new(request.role_id)?;
    let assignment = state
        .core
        .users
        .grant_role(
            UserId(id),
            role_id,
            request.context,
            UserId(request.assigned_by),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

async fn permission_check(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PermissionCheckRequest>,
) -> Result<Json<PermissionCheckResponse>, AppError> {
    let allowed = state
        .core
        .users
        .has_permission(
            &UserId(id),
            &Permission::new(request.permission),
            request.context.as_ref(),
        )
        .await?;
    Ok(Json(PermissionCheckResponse { allowed }))
}
