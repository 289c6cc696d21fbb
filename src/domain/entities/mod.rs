//! Core domain entities representing the business data model.
//!
//! The service persists a single entity, [`UrlEntry`]. The reverse
//! (original → code) index is a backend concern and has no entity of its own.

pub mod url_entry;

pub use url_entry::UrlEntry;
