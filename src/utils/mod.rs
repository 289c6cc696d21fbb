//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_normalizer`] - URL normalization and sanitization
//! - [`url_digest`] - Fixed-length reverse-index keys
//! - [`request_origin`] - Public origin extraction from HTTP headers

pub mod code_generator;
pub mod request_origin;
pub mod url_digest;
pub mod url_normalizer;
