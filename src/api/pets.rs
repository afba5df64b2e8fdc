//! Pet API handlers.
//!
//! # Purpose
//! Implements pet CRUD, the available/adopted shortcut listings, and the
//! mark-adopted action with consistent error mapping for store failures.
use crate::api::error::{ApiError, api_from_store};
use crate::api::types::{Paginated, StatusMessage};
use crate::app::AppState;
use crate::model::{Pet, PetAge, PetGender, PetPayload, PetStatus, PetType};
use crate::store::{PageRequest, PetFilter};
use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

const NOT_FOUND: &str = "Pet not found";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PetListQuery {
    pub pet_type: Option<PetType>,
    pub age: Option<PetAge>,
    pub gender: Option<PetGender>,
    pub status: Option<PetStatus>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PetListQuery {
    fn filter(&self) -> PetFilter {
        PetFilter {
            pet_type: self.pet_type,
            age: self.age,
            gender: self.gender,
            status: self.status,
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
    path = "/pets/",
    tag = "pets",
    params(PetListQuery),
    responses(
        (status = 200, description = "Paginated pet list", body = Paginated<Pet>)
    )
)]
pub(crate) async fn list_pets(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PetListQuery>,
) -> Result<Json<Paginated<Pet>>, ApiError> {
    let page = state
        .store
        .list_pets(query.filter(), query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    post,
    path = "/pets/",
    tag = "pets",
    request_body = PetPayload,
    responses(
        (status = 201, description = "Pet created", body = Pet),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_pet(
    State(state): State<AppState>,
    Json(payload): Json<PetPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let pet = state
        .store
        .create_pet(payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok((StatusCode::CREATED, Json(pet)))
}

#[utoipa::path(
    get,
    path = "/pets/{id}/",
    tag = "pets",
    params(("id" = i64, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet detail", body = Pet),
        (status = 404, description = "Pet not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_pet(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Pet>, ApiError> {
    let pet = state
        .store
        .get_pet(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(pet))
}

#[utoipa::path(
    put,
    path = "/pets/{id}/",
    tag = "pets",
    params(("id" = i64, Path, description = "Pet identifier")),
    request_body = PetPayload,
    responses(
        (status = 200, description = "Pet updated", body = Pet),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Pet not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_pet(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<PetPayload>,
) -> Result<Json<Pet>, ApiError> {
    let pet = state
        .store
        .update_pet(id, payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(pet))
}

#[utoipa::path(
    delete,
    path = "/pets/{id}/",
    tag = "pets",
    params(("id" = i64, Path, description = "Pet identifier")),
    responses(
        (status = 204, description = "Pet deleted; its applications cascade"),
        (status = 404, description = "Pet not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_pet(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_pet(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/pets/available/",
    tag = "pets",
    responses(
        (status = 200, description = "Pets currently available for adoption", body = Paginated<Pet>)
    )
)]
pub(crate) async fn available_pets(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PetListQuery>,
) -> Result<Json<Paginated<Pet>>, ApiError> {
    let filter = PetFilter { status: Some(PetStatus::Available), ..query.filter() };
    let page = state
        .store
        .list_pets(filter, query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    get,
    path = "/pets/adopted/",
    tag = "pets",
    responses(
        (status = 200, description = "Pets that found a home", body = Paginated<Pet>)
    )
)]
pub(crate) async fn adopted_pets(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PetListQuery>,
) -> Result<Json<Paginated<Pet>>, ApiError> {
    let filter = PetFilter { status: Some(PetStatus::Adopted), ..query.filter() };
    let page = state
        .store
        .list_pets(filter, query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    post,
    path = "/pets/{id}/mark_adopted/",
    tag = "pets",
    params(("id" = i64, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet marked as adopted", body = StatusMessage),
        (status = 404, description = "Pet not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn mark_adopted(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .store
        .mark_pet_adopted(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(StatusMessage::new("Pet marked as adopted")))
}
