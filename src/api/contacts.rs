//! Contact message API handlers.
use crate::api::error::{ApiError, api_from_store};
use crate::api::types::{Paginated, StatusMessage};
use crate::app::AppState;
use crate::model::{Contact, ContactPayload, ContactSubject};
use crate::store::{ContactFilter, PageRequest};
use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

const NOT_FOUND: &str = "Contact message not found";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ContactListQuery {
    pub is_read: Option<bool>,
    pub subject: Option<ContactSubject>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ContactListQuery {
    fn filter(&self) -> ContactFilter {
        ContactFilter {
            is_read: self.is_read,
            subject: self.subject,
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
    path = "/contacts/",
    tag = "contacts",
    params(ContactListQuery),
    responses(
        (status = 200, description = "Paginated contact message list", body = Paginated<Contact>)
    )
)]
pub(crate) async fn list_contacts(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<Paginated<Contact>>, ApiError> {
    let page = state
        .store
        .list_contacts(query.filter(), query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    post,
    path = "/contacts/",
    tag = "contacts",
    request_body = ContactPayload,
    responses(
        (status = 201, description = "Message received", body = Contact),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state
        .store
        .create_contact(payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok((StatusCode::CREATED, Json(contact)))
}

#[utoipa::path(
    get,
    path = "/contacts/{id}/",
    tag = "contacts",
    params(("id" = i64, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Message detail", body = Contact),
        (status = 404, description = "Message not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_contact(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state
        .store
        .get_contact(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(contact))
}

#[utoipa::path(
    put,
    path = "/contacts/{id}/",
    tag = "contacts",
    params(("id" = i64, Path, description = "Message identifier")),
    request_body = ContactPayload,
    responses(
        (status = 200, description = "Message updated", body = Contact),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Message not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_contact(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state
        .store
        .update_contact(id, payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(contact))
}

#[utoipa::path(
    delete,
    path = "/contacts/{id}/",
    tag = "contacts",
    params(("id" = i64, Path, description = "Message identifier")),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 404, description = "Message not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_contact(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_contact(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/contacts/unread/",
    tag = "contacts",
    responses(
        (status = 200, description = "Messages not yet read", body = Paginated<Contact>)
    )
)]
pub(crate) async fn unread_contacts(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<Paginated<Contact>>, ApiError> {
    let filter = ContactFilter { is_read: Some(false), ..query.filter() };
    let page = state
        .store
        .list_contacts(filter, query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    post,
    path = "/contacts/{id}/mark_as_read/",
    tag = "contacts",
    params(("id" = i64, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Message marked as read", body = StatusMessage),
        (status = 404, description = "Message not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn mark_as_read(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .store
        .set_contact_read(id, true)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(StatusMessage::new("Message marked as read")))
}

#[utoipa::path(
    post,
    path = "/contacts/{id}/mark_as_unread/",
    tag = "contacts",
    params(("id" = i64, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Message marked as unread", body = StatusMessage),
        (status = 404, description = "Message not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn mark_as_unread(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .store
        .set_contact_read(id, false)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(StatusMessage::new("Message marked as unread")))
}
