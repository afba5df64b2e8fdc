//! Pawhaven service library crate.
//!
//! # Purpose
//! Exposes the adoption-center API surface, configuration, observability
//! wiring, and storage implementations for use by the binary and tests.
//!
//! # Notes
//! Module boundaries mirror the HTTP API and storage backends for clarity.
pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
