//! Store trait definitions for the domain layer.
//!
//! The [`UrlStore`] trait is the contract between the link service and the
//! storage backends in `crate::infrastructure::persistence`. A `mockall` mock is
//! generated for unit tests.

pub mod url_store;

pub use url_store::{StoreError, UrlStore};

#[cfg(test)]
pub use url_store::MockUrlStore;
