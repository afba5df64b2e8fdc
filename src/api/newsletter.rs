//! Newsletter subscription API handlers.
//!
//! # Purpose
//! Subscribe/unsubscribe plus admin listings and the subscriber count. The
//! subscribe handler distinguishes a brand-new signup (201) from a
//! reactivated one (200) so clients can tell the difference.
use crate::api::error::{ApiError, api_from_store};
use crate::api::types::{Paginated, StatusMessage, SubscriberCountResponse};
use crate::app::AppState;
use crate::model::{Subscription, SubscriptionPayload};
use crate::store::{PageRequest, SubscriptionFilter};
use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

const NOT_FOUND: &str = "Subscription not found";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct SubscriptionListQuery {
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SubscriptionListQuery {
    fn filter(&self) -> SubscriptionFilter {
        SubscriptionFilter {
            is_active: self.is_active,
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
    path = "/newsletter/",
    tag = "newsletter",
    params(SubscriptionListQuery),
    responses(
        (status = 200, description = "Paginated subscription list", body = Paginated<Subscription>)
    )
)]
pub(crate) async fn list_subscriptions(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SubscriptionListQuery>,
) -> Result<Json<Paginated<Subscription>>, ApiError> {
    let page = state
        .store
        .list_subscriptions(query.filter(), query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    post,
    path = "/newsletter/",
    tag = "newsletter",
    request_body = SubscriptionPayload,
    responses(
        (status = 201, description = "New subscription created", body = Subscription),
        (status = 200, description = "Inactive subscription reactivated", body = Subscription),
        (status = 400, description = "Invalid email or already subscribed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscriptionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .store
        .subscribe(payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    let status = if outcome.reactivated { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(outcome.subscription)))
}

#[utoipa::path(
    get,
    path = "/newsletter/{id}/",
    tag = "newsletter",
    params(("id" = i64, Path, description = "Subscription identifier")),
    responses(
        (status = 200, description = "Subscription detail", body = Subscription),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_subscription(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Subscription>, ApiError> {
    let subscription = state
        .store
        .get_subscription(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(subscription))
}

#[utoipa::path(
    put,
    path = "/newsletter/{id}/",
    tag = "newsletter",
    params(("id" = i64, Path, description = "Subscription identifier")),
    request_body = SubscriptionPayload,
    responses(
        (status = 200, description = "Subscription updated", body = Subscription),
        (status = 400, description = "Invalid or already-taken email", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_subscription(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<SubscriptionPayload>,
) -> Result<Json<Subscription>, ApiError> {
    let subscription = state
        .store
        .update_subscription(id, payload)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(subscription))
}

#[utoipa::path(
    delete,
    path = "/newsletter/{id}/",
    tag = "newsletter",
    params(("id" = i64, Path, description = "Subscription identifier")),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_subscription(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_subscription(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/newsletter/active/",
    tag = "newsletter",
    responses(
        (status = 200, description = "Subscriptions still receiving mail", body = Paginated<Subscription>)
    )
)]
pub(crate) async fn active_subscriptions(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SubscriptionListQuery>,
) -> Result<Json<Paginated<Subscription>>, ApiError> {
    let filter = SubscriptionFilter { is_active: Some(true), ..query.filter() };
    let page = state
        .store
        .list_subscriptions(filter, query.page())
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(Paginated::from_page(page, &uri)))
}

#[utoipa::path(
    get,
    path = "/newsletter/count/",
    tag = "newsletter",
    responses(
        (status = 200, description = "Active and total subscriber counts", body = SubscriberCountResponse)
    )
)]
pub(crate) async fn subscriber_count(
    State(state): State<AppState>,
) -> Result<Json<SubscriberCountResponse>, ApiError> {
    let counts = state
        .store
        .subscriber_counts()
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(SubscriberCountResponse {
        active_subscribers: counts.active_subscribers,
        total_subscribers: counts.total_subscribers,
    }))
}

#[utoipa::path(
    post,
    path = "/newsletter/{id}/unsubscribe/",
    tag = "newsletter",
    params(("id" = i64, Path, description = "Subscription identifier")),
    responses(
        (status = 200, description = "Subscription deactivated", body = StatusMessage),
        (status = 404, description = "Subscription not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn unsubscribe(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .store
        .unsubscribe(id)
        .await
        .map_err(|err| api_from_store(NOT_FOUND, err))?;
    Ok(Json(StatusMessage::new("Successfully unsubscribed")))
}
