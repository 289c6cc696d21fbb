//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::UrlStore`] trait and give
//! HTTP handlers and the admin CLI a small, validated API.
//!
//! - [`services::link_service::LinkService`] - Shortening, resolution and listing

pub mod services;
