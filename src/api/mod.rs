//! Pawhaven HTTP API module.
//!
//! # Purpose
//! Exposes the per-entity route handler modules, shared response types, and
//! the error mapping helpers used by every handler.
pub mod adoptions;
pub mod contacts;
pub mod donations;
pub mod error;
pub mod newsletter;
pub mod openapi;
pub mod pets;
pub mod system;
pub mod types;
pub mod volunteers;
