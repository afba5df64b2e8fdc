//! HTTP API request/response types.
//!
//! # Purpose
//! Defines shared payload shapes for the REST API and OpenAPI schema
//! generation: the pagination envelope, action status messages, error
//! bodies, and system endpoint responses.
use axum::http::Uri;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::store::Page;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FeatureFlags {
    pub durable_storage: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub service: String,
    pub api_version: String,
    pub features: FeatureFlags,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

/// Uniform error body. `errors` carries the per-field map for validation
/// failures and is omitted otherwise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

/// Response body for status-changing actions: `{"status": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct StatusMessage {
    pub status: String,
}

impl StatusMessage {
    pub fn new(message: &str) -> Self {
        StatusMessage { status: message.to_string() }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct SubscriberCountResponse {
    pub active_subscribers: u64,
    pub total_subscribers: u64,
}

/// Collection envelope: total count plus relative next/previous page links.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wrap one store page, deriving the page links from the request URI.
    ///
    /// Links are relative (path + query with `page` rewritten) so they stay
    /// valid behind proxies without knowing the external hostname.
    pub fn from_page(page: Page<T>, uri: &Uri) -> Self {
        let next = page.has_next().then(|| page_link(uri, page.page + 1));
        let previous = page.has_previous().then(|| page_link(uri, page.page - 1));
        Paginated { count: page.total, next, previous, results: page.items }
    }
}

/// Rebuild the request URI with the `page` query parameter set to `page`.
fn page_link(uri: &Uri, page: u32) -> String {
    let path = uri.path();
    let mut pairs: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("page=") && *pair != "page")
        .map(str::to_string)
        .collect();
    pairs.push(format!("page={page}"));
    format!("{path}?{}", pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: u64, page: u32) -> Page<u8> {
        Page { items: vec![], total, page, page_size: 10 }
    }

    #[test]
    fn links_rewrite_the_page_parameter() {
        let uri: Uri = "/pets/?status=available&page=2&ordering=name".parse().unwrap();
        let wrapped = Paginated::from_page(page_of(35, 2), &uri);
        assert_eq!(wrapped.next.as_deref(), Some("/pets/?status=available&ordering=name&page=3"));
        assert_eq!(
            wrapped.previous.as_deref(),
            Some("/pets/?status=available&ordering=name&page=1")
        );
    }

    #[test]
    fn first_page_has_no_previous() {
        let uri: Uri = "/pets/".parse().unwrap();
        let wrapped = Paginated::from_page(page_of(25, 1), &uri);
        assert!(wrapped.previous.is_none());
        assert_eq!(wrapped.next.as_deref(), Some("/pets/?page=2"));
    }

    #[test]
    fn single_page_has_no_links() {
        let uri: Uri = "/pets/".parse().unwrap();
        let wrapped = Paginated::from_page(page_of(5, 1), &uri);
        assert!(wrapped.next.is_none());
        assert!(wrapped.previous.is_none());
        assert_eq!(wrapped.count, 5);
    }
}
