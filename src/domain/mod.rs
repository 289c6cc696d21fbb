//! Domain layer containing business entities and contracts.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Store trait implemented by the infrastructure layer
//! - [`hit_event`] - Hit counting event model
//! - [`hit_worker`] - Asynchronous hit counting worker
//!
//! # Hit Counting Flow
//!
//! 1. The redirect handler resolves a code and answers immediately
//! 2. A [`hit_event::HitEvent`] is pushed onto a bounded channel (dropped if full)
//! 3. [`hit_worker::run_hit_worker`] calls [`repositories::UrlStore::increment_hit`]
//! 4. Failures are logged and counted, never surfaced to the visitor

pub mod entities;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
