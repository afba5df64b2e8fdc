//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and testable.
//! Routes use trailing slashes throughout. Static segments such as
//! `/pets/available/` take precedence over `/pets/:id/` in the route matcher.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::api::types::FeatureFlags;
use crate::observability;
use crate::store::ShelterStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub features: FeatureFlags,
    pub store: Arc<dyn ShelterStore + Send + Sync>,
}

impl AppState {
    pub fn new(store: Arc<dyn ShelterStore + Send + Sync>) -> Self {
        let features = FeatureFlags { durable_storage: store.is_durable() };
        AppState { api_version: "v1".to_string(), features, store }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route("/system/info/", axum::routing::get(api::system::system_info))
        .route("/system/health/", axum::routing::get(api::system::system_health))
        .route(
            "/pets/",
            axum::routing::get(api::pets::list_pets).post(api::pets::create_pet),
        )
        .route("/pets/available/", axum::routing::get(api::pets::available_pets))
        .route("/pets/adopted/", axum::routing::get(api::pets::adopted_pets))
        .route(
            "/pets/:id/",
            axum::routing::get(api::pets::get_pet)
                .put(api::pets::update_pet)
                .patch(api::pets::update_pet)
                .delete(api::pets::delete_pet),
        )
        .route("/pets/:id/mark_adopted/", axum::routing::post(api::pets::mark_adopted))
        .route(
            "/adoptions/",
            axum::routing::get(api::adoptions::list_adoptions)
                .post(api::adoptions::create_adoption),
        )
        .route("/adoptions/pending/", axum::routing::get(api::adoptions::pending_adoptions))
        .route(
            "/adoptions/:id/",
            axum::routing::get(api::adoptions::get_adoption)
                .put(api::adoptions::update_adoption)
                .patch(api::adoptions::update_adoption)
                .delete(api::adoptions::delete_adoption),
        )
        .route(
            "/adoptions/:id/approve/",
            axum::routing::post(api::adoptions::approve_adoption),
        )
        .route("/adoptions/:id/reject/", axum::routing::post(api::adoptions::reject_adoption))
        .route(
            "/adoptions/:id/complete/",
            axum::routing::post(api::adoptions::complete_adoption),
        )
        .route(
            "/contacts/",
            axum::routing::get(api::contacts::list_contacts).post(api::contacts::create_contact),
        )
        .route("/contacts/unread/", axum::routing::get(api::contacts::unread_contacts))
        .route(
            "/contacts/:id/",
            axum::routing::get(api::contacts::get_contact)
                .put(api::contacts::update_contact)
                .patch(api::contacts::update_contact)
                .delete(api::contacts::delete_contact),
        )
        .route(
            "/contacts/:id/mark_as_read/",
            axum::routing::post(api::contacts::mark_as_read),
        )
        .route(
            "/contacts/:id/mark_as_unread/",
            axum::routing::post(api::contacts::mark_as_unread),
        )
        .route(
            "/volunteers/",
            axum::routing::get(api::volunteers::list_volunteers)
                .post(api::volunteers::create_volunteer),
        )
        .route(
            "/volunteers/pending/",
            axum::routing::get(api::volunteers::pending_volunteers),
        )
        .route(
            "/volunteers/approved/",
            axum::routing::get(api::volunteers::approved_volunteers),
        )
        .route(
            "/volunteers/:id/",
            axum::routing::get(api::volunteers::get_volunteer)
                .put(api::volunteers::update_volunteer)
                .patch(api::volunteers::update_volunteer)
                .delete(api::volunteers::delete_volunteer),
        )
        .route(
            "/volunteers/:id/approve/",
            axum::routing::post(api::volunteers::approve_volunteer),
        )
        .route(
            "/volunteers/:id/reject/",
            axum::routing::post(api::volunteers::reject_volunteer),
        )
        .route(
            "/donations/",
            axum::routing::get(api::donations::list_donations)
                .post(api::donations::create_donation),
        )
        .route(
            "/donations/completed/",
            axum::routing::get(api::donations::completed_donations),
        )
        .route(
            "/donations/statistics/",
            axum::routing::get(api::donations::donation_statistics),
        )
        .route(
            "/donations/:id/",
            axum::routing::get(api::donations::get_donation)
                .put(api::donations::update_donation)
                .patch(api::donations::update_donation)
                .delete(api::donations::delete_donation),
        )
        .route(
            "/donations/:id/mark_completed/",
            axum::routing::post(api::donations::mark_completed),
        )
        .route(
            "/newsletter/",
            axum::routing::get(api::newsletter::list_subscriptions)
                .post(api::newsletter::subscribe),
        )
        .route(
            "/newsletter/active/",
            axum::routing::get(api::newsletter::active_subscriptions),
        )
        .route("/newsletter/count/", axum::routing::get(api::newsletter::subscriber_count))
        .route(
            "/newsletter/:id/",
            axum::routing::get(api::newsletter::get_subscription)
                .put(api::newsletter::update_subscription)
                .patch(api::newsletter::update_subscription)
                .delete(api::newsletter::delete_subscription),
        )
        .route(
            "/newsletter/:id/unsubscribe/",
            axum::routing::post(api::newsletter::unsubscribe),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
