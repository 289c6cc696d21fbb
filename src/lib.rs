//! # urlsh
//!
//! A URL shortener with deduplication and hit counting, served over Axum and
//! backed by PostgreSQL, Redis or memory.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, the [`domain::repositories::UrlStore`]
//!   contract and the background hit worker
//! - **Application Layer** ([`application`]) - Shortening, resolving and listing
//! - **Infrastructure Layer** ([`infrastructure`]) - Store backends and the
//!   timeout/retry decorator
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Behaviour
//!
//! - Submitted URLs are normalized; equivalent URLs share one 7-character code
//! - Redirects answer immediately; hits are counted asynchronously and may be
//!   dropped under load
//! - `GET /api/stats` lists the 20 most recent links
//!
//! ## Quick Start
//!
//! ```bash
//! export STORAGE_BACKEND=memory
//! cargo run
//!
//! curl -X POST localhost:3000/api/shorten -H 'content-type: application/json' \
//!      -d '{"url":"https://example.com"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, Shortened};
    pub use crate::domain::entities::UrlEntry;
    pub use crate::domain::hit_event::HitEvent;
    pub use crate::domain::repositories::{StoreError, UrlStore};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::MemoryUrlStore;
    pub use crate::state::AppState;
}
