//! Adoption application API handlers.
//!
//! # Purpose
//! Implements application CRUD plus the guarded approve/reject/complete
//! actions. Transition handling lives in the store; these handlers only map
//! outcomes to HTTP.
use crate::api::error::{ApiError, api_from_store};
use crate::api::types::{Paginated, StatusMessage};
use crate::app::AppState;
use crate::model::{Adoption, AdoptionAction, AdoptionPayload, AdoptionStatus};
use crate::store::{AdoptionFilter, PageRequest};
use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

const NOT_FOUND: &str = "Adoption application not found";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct AdoptionListQuery {
    pub status: Option<AdoptionStatus>,
    pub pet_id: Option<i64>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl AdoptionListQuery {
    fn filter(&self) -> AdoptionFilter {
        AdoptionFilter {
            status: self.status,
            pet_id: self.pet_id,
            ordering: self.ordering.clone(),
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[utoipa::path(
    get,
    path = "/adoptions/",
    tag = "adoptions",
    params(AdoptionListQuery),
    responses(
        (status = 200, description = "Paginated application list", body = Paginated<Adoption>)
    )
)]
pub(crate) async fn list_adoptions(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AdoptionListQuery>,
) -> Result<Json<Paginated<Adoption>>, ApiError> {
    let page = state
        .store
        .list_adoptions(query.filter(), query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    post,
    path = "/adoptions/",
    tag = "adoptions",
    request_body = AdoptionPayload,
    responses(
        (status = 201, description = "Application submitted", body = Adoption),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Referenced pet not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_adoption(
    State(state): State<AppState>,
    Json(payload): Json<AdoptionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let adoption = state
        .store
        .create_adoption(payload)
        .await
        .map_err(|err| api_from_store("Pet not found", err))?;
    Ok((StatusCode::CREATED, Json(adoption)))
}

#[utoipa::path(
    get,
    path = "/adoptions/{id}/",
    tag = "adoptions",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Application detail", body = Adoption),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_adoption(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Adoption>, ApiError> {
    let adoption = state
        .store
        .get_adoption(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(adoption))
}

#[utoipa::path(
    put,
    path = "/adoptions/{id}/",
    tag = "adoptions",
    params(("id" = i64, Path, description = "Application identifier")),
    request_body = AdoptionPayload,
    responses(
        (status = 200, description = "Application updated", body = Adoption),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_adoption(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<AdoptionPayload>,
) -> Result<Json<Adoption>, ApiError> {
    let adoption = state
        .store
        .update_adoption(id, payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(adoption))
}

#[utoipa::path(
    delete,
    path = "/adoptions/{id}/",
    tag = "adoptions",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_adoption(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_adoption(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/adoptions/pending/",
    tag = "adoptions",
    responses(
        (status = 200, description = "Applications awaiting review", body = Paginated<Adoption>)
    )
)]
pub(crate) async fn pending_adoptions(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AdoptionListQuery>,
) -> Result<Json<Paginated<Adoption>>, ApiError> {
    let filter = AdoptionFilter { status: Some(AdoptionStatus::Pending), ..query.filter() };
    let page = state
        .store
        .list_adoptions(filter, query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

async fn transition(
    state: AppState,
    id: i64,
    action: AdoptionAction,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .store
        .transition_adoption(id, action)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(StatusMessage::new(action.message())))
}

#[utoipa::path(
    post,
    path = "/adoptions/{id}/approve/",
    tag = "adoptions",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Application approved; pet goes pending", body = StatusMessage),
        (status = 400, description = "Application is not pending", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn approve_adoption(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    transition(state, id, AdoptionAction::Approve).await
}

#[utoipa::path(
    post,
    path = "/adoptions/{id}/reject/",
    tag = "adoptions",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Application rejected", body = StatusMessage),
        (status = 400, description = "Application is not pending", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn reject_adoption(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    transition(state, id, AdoptionAction::Reject).await
}

#[utoipa::path(
    post,
    path = "/adoptions/{id}/complete/",
    tag = "adoptions",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Adoption completed; pet marked adopted", body = StatusMessage),
        (status = 400, description = "Application is not approved", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn complete_adoption(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    transition(state, id, AdoptionAction::Complete).await
}
