//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction to keep error shapes uniform
//! across endpoints.
//!
//! # Key invariants and assumptions
//! - Error responses must include a stable `code` and human-readable `message`.
//! - Status codes must align with the error category.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
//! - Request IDs are optional; avoid leaking sensitive details in messages.
use crate::api::types::ErrorResponse;
use crate::model::ValidationErrors;
use crate::model::transitions::TransitionError;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # What it does
/// Couples an HTTP status code with a JSON error body.
///
/// # Why it exists
/// Provides a single error type that implements `IntoResponse` for Axum.
///
/// # Invariants
/// - `status` must match the semantics of `body.code`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        body: ErrorResponse {
            code: "not_found".to_string(),
            message: message.to_string(),
            request_id: None,
            errors: None,
        },
    }
}

/// Build a 400 Bad Request carrying the full field→message map.
pub fn api_validation(errors: ValidationErrors) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "validation_error".to_string(),
            message: "Invalid input.".to_string(),
            request_id: None,
            errors: Some(errors.0),
        },
    }
}

/// Build a 400 Bad Request naming the violated status precondition.
pub fn api_invalid_transition(err: &TransitionError) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "invalid_transition".to_string(),
            message: err.to_string(),
            request_id: None,
            errors: None,
        },
    }
}

/// Build a 400 Bad Request for an already-active subscription.
pub fn api_duplicate_subscription() -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "duplicate_subscription".to_string(),
            message: "Email already subscribed".to_string(),
            request_id: None,
            errors: None,
        },
    }
}

/// Build a 500 Internal Server Error from a store error.
///
/// # What it does
/// Logs the store error and returns a generic internal error response.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    // Log internal details server-side for debugging; return generic message.
    tracing::error!(error = ?err, "storage error");
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorResponse {
            code: "internal".to_string(),
            message: message.to_string(),
            request_id: None,
            errors: None,
        },
    }
}

/// Map a store failure to the HTTP error for that taxonomy entry.
///
/// `not_found_message` names the entity so 404 bodies read naturally
/// ("Pet not found", "Adoption application not found", ...).
pub fn api_from_store(not_found_message: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => api_not_found(not_found_message),
        StoreError::Validation(errors) => api_validation(errors),
        StoreError::InvalidTransition(err) => api_invalid_transition(&err),
        StoreError::DuplicateSubscription(_) => api_duplicate_subscription(),
        err @ StoreError::Unexpected(_) => api_internal("storage backend failure", &err),
    }
}
