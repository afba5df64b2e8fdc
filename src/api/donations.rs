//! Donation API handlers.
//!
//! # Purpose
//! Donation CRUD plus the aggregate statistics endpoint, the completed
//! shortcut listing, and the mark-completed action.
use crate::api::error::{ApiError, api_from_store};
use crate::api::types::{Paginated, StatusMessage};
use crate::app::AppState;
use crate::model::{Donation, DonationPayload, DonationStatistics, PaymentStatus};
use crate::store::{DonationFilter, PageRequest};
use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

const NOT_FOUND: &str = "Donation not found";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct DonationListQuery {
    pub payment_status: Option<PaymentStatus>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl DonationListQuery {
    fn filter(&self) -> DonationFilter {
        DonationFilter {
            payment_status: self.payment_status,
            ordering: self.ordering.clone(),
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[utoipa::path(
    get,
    path = "/donations/",
    tag = "donations",
    params(DonationListQuery),
    responses(
        (status = 200, description = "Paginated donation list", body = Paginated<Donation>)
    )
)]
pub(crate) async fn list_donations(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DonationListQuery>,
) -> Result<Json<Paginated<Donation>>, ApiError> {
    let page = state
        .store
        .list_donations(query.filter(), query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    post,
    path = "/donations/",
    tag = "donations",
    request_body = DonationPayload,
    responses(
        (status = 201, description = "Donation recorded", body = Donation),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_donation(
    State(state): State<AppState>,
    Json(payload): Json<DonationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let donation = state
        .store
        .create_donation(payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok((StatusCode::CREATED, Json(donation)))
}

#[utoipa::path(
    get,
    path = "/donations/{id}/",
    tag = "donations",
    params(("id" = i64, Path, description = "Donation identifier")),
    responses(
        (status = 200, description = "Donation detail", body = Donation),
        (status = 404, description = "Donation not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_donation(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Donation>, ApiError> {
    let donation = state
        .store
        .get_donation(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(donation))
}

#[utoipa::path(
    put,
    path = "/donations/{id}/",
    tag = "donations",
    params(("id" = i64, Path, description = "Donation identifier")),
    request_body = DonationPayload,
    responses(
        (status = 200, description = "Donation updated", body = Donation),
        (status = 400, description = "Validation failed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Donation not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_donation(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<DonationPayload>,
) -> Result<Json<Donation>, ApiError> {
    let donation = state
        .store
        .update_donation(id, payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(donation))
}

#[utoipa::path(
    delete,
    path = "/donations/{id}/",
    tag = "donations",
    params(("id" = i64, Path, description = "Donation identifier")),
    responses(
        (status = 204, description = "Donation deleted"),
        (status = 404, description = "Donation not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_donation(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_donation(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/donations/completed/",
    tag = "donations",
    responses(
        (status = 200, description = "Donations with settled payments", body = Paginated<Donation>)
    )
)]
pub(crate) async fn completed_donations(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DonationListQuery>,
) -> Result<Json<Paginated<Donation>>, ApiError> {
    let filter = DonationFilter { payment_status: Some(PaymentStatus::Completed), ..query.filter() };
    let page = state
        .store
        .list_donations(filter, query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    get,
    path = "/donations/statistics/",
    tag = "donations",
    responses(
        (status = 200, description = "Aggregates over completed donations", body = DonationStatistics)
    )
)]
pub(crate) async fn donation_statistics(
    State(state): State<AppState>,
) -> Result<Json<DonationStatistics>, ApiError> {
    let stats = state
        .store
        .donation_statistics()
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(stats))
}

#[utoipa::path(
    post,
    path = "/donations/{id}/mark_completed/",
    tag = "donations",
    params(("id" = i64, Path, description = "Donation identifier")),
    responses(
        (status = 200, description = "Payment marked as completed", body = StatusMessage),
        (status = 404, description = "Donation not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn mark_completed(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .store
        .complete_donation(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(StatusMessage::new("Donation marked as completed")))
}
