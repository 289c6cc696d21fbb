//! Infrastructure layer for external integrations.
//!
//! Implements the [`crate::domain::repositories::UrlStore`] contract for each
//! supported backend.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL, Redis and in-memory stores

pub mod persistence;
