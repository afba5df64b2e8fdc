//! Volunteer application API handlers.
use crate::api::error::{ApiError, api_from_store};
use crate::api::types::{Paginated, StatusMessage};
use crate::app::AppState;
use crate::model::{Volunteer, VolunteerAction, VolunteerInterest, VolunteerPayload, VolunteerStatus};
use crate::store::{PageRequest, VolunteerFilter};
use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

const NOT_FOUND: &str = "Volunteer application not found";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct VolunteerListQuery {
    pub status: Option<VolunteerStatus>,
    pub interest: Option<VolunteerInterest>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl VolunteerListQuery {
    fn filter(&self) -> VolunteerFilter {
        VolunteerFilter {
            status: self.status,
            interest: self.interest,
            search: self.search.clone(),
            ordering: self.ordering.clone(),
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[utoipa::path(
    get,
    path = "/volunteers/",
    tag = "volunteers",
    params(VolunteerListQuery),
    responses(
        (status = 200, description = "Paginated volunteer application list", body = Paginated<Volunteer>)
    )
)]
pub(crate) async fn list_volunteers(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<VolunteerListQuery>,
) -> Result<Json<Paginated<Volunteer>>, ApiError> {
    let page = state
        .store
        .list_volunteers(query.filter(), query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    post,
    path = "/volunteers/",
    tag = "volunteers",
    request_body = VolunteerPayload,
    responses(
        (status = 201, description = "Application submitted", body = Volunteer),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_volunteer(
    State(state): State<AppState>,
    Json(payload): Json<VolunteerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let volunteer = state
        .store
        .create_volunteer(payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok((StatusCode::CREATED, Json(volunteer)))
}

#[utoipa::path(
    get,
    path = "/volunteers/{id}/",
    tag = "volunteers",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Application detail", body = Volunteer),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_volunteer(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Volunteer>, ApiError> {
    let volunteer = state
        .store
        .get_volunteer(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(volunteer))
}

#[utoipa::path(
    put,
    path = "/volunteers/{id}/",
    tag = "volunteers",
    params(("id" = i64, Path, description = "Application identifier")),
    request_body = VolunteerPayload,
    responses(
        (status = 200, description = "Application updated", body = Volunteer),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_volunteer(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<VolunteerPayload>,
) -> Result<Json<Volunteer>, ApiError> {
    let volunteer = state
        .store
        .update_volunteer(id, payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(volunteer))
}

#[utoipa::path(
    delete,
    path = "/volunteers/{id}/",
    tag = "volunteers",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_volunteer(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_volunteer(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/volunteers/pending/",
    tag = "volunteers",
    responses(
        (status = 200, description = "Applications awaiting review", body = Paginated<Volunteer>)
    )
)]
pub(crate) async fn pending_volunteers(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<VolunteerListQuery>,
) -> Result<Json<Paginated<Volunteer>>, ApiError> {
    let filter = VolunteerFilter { status: Some(VolunteerStatus::Pending), ..query.filter() };
    let page = state
        .store
        .list_volunteers(filter, query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    get,
    path = "/volunteers/approved/",
    tag = "volunteers",
    responses(
        (status = 200, description = "Active approved volunteers", body = Paginated<Volunteer>)
    )
)]
pub(crate) async fn approved_volunteers(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<VolunteerListQuery>,
) -> Result<Json<Paginated<Volunteer>>, ApiError> {
    let filter = VolunteerFilter { status: Some(VolunteerStatus::Approved), ..query.filter() };
    let page = state
        .store
        .list_volunteers(filter, query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

async fn transition(
    state: AppState,
    id: i64,
    action: VolunteerAction,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .store
        .transition_volunteer(id, action)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(StatusMessage::new(action.message())))
}

#[utoipa::path(
    post,
    path = "/volunteers/{id}/approve/",
    tag = "volunteers",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Volunteer approved", body = StatusMessage),
        (status = 400, description = "Application is not pending", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn approve_volunteer(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    transition(state, id, VolunteerAction::Approve).await
}

#[utoipa::path(
    post,
    path = "/volunteers/{id}/reject/",
    tag = "volunteers",
    params(("id" = i64, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Volunteer rejected", body = StatusMessage),
        (status = 400, description = "Application is not pending", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Application not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn reject_volunteer(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    transition(state, id, VolunteerAction::Reject).await
}
