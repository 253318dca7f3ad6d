//! # Organization Routes
//!
//! Routes:
//! - POST /v1/organizations — onboard an organization
//! - GET  /v1/organizations — list all
//! - GET  /v1/organizations/{id} — fetch one
//! - PUT  /v1/organizations/{id}/status — lifecycle transition
//! - POST /v1/organizations/{id}/domains — claim a domain
//! - GET  /v1/organizations/{id}/engagements — engagements for one org

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use audex_core::OrgId;
use audex_domain::CreateOrganization;
use audex_schema::{Engagement, Organization};
use audex_state::OrgStatus;

use crate::{AppError, AppState};

/// Organization router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/organizations", post(create).get(list))
        .route("/v1/organizations/{id}", get(show))
        .route("/v1/organizations/{id}/status", put(set_status))
        .route("/v1/organizations/{id}/domains", post(add_domain))
        .route("/v1/organizations/{id}/engagements", get(engagements))
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    name: String,
    requested_id: Option<String>,
    #[serde(default)]
    org_domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: OrgStatus,
}

#[derive(Debug, Deserialize)]
struct DomainRequest {
    domain: String,
}

async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Organization>), AppError> {
    let org = state
        .core
        .organizations
        .create_organization(CreateOrganization {
            name: request.name,
            requested_id: request.requested_id,
            org_domains: request.org_domains,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(org)))
}

async fn list(State(state): State<AppState>) -> Json<Vec<Organization>> {
    Json(state.core.organizations.list_organizations().await)
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Organization>, AppError> {
    let id = OrgId::new(id)?;
    Ok(Json(state.core.organizations.get_organization(&id).await?))
}

async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Organization>, AppError> {
    let id = OrgId::new(id)?;
    Ok(Json(
        state
            .core
            .organizations
            .transition_status(&id, request.status)
            .await?,
    ))
}

async fn add_domain(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DomainRequest>,
) -> Result<Json<Organization>, AppError> {
    let id = OrgId::new(id)?;
    Ok(Json(
        state
            .core
            .organizations
            .add_domain(&id, request.domain)
            .await?,
    ))
}

async fn engagements(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Engagement>>, AppError> {
    let id = OrgId::new(id)?;
    Ok(Json(state.core.engagements.list_engagements(&id).await))
}
