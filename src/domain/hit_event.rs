//! Hit event model for asynchronous hit counting.

/// A resolved redirect waiting to be counted.
///
/// Created by the redirect handler and sent over a bounded channel to
/// [`crate::domain::hit_worker::run_hit_worker`], so the redirect response never
/// waits on the counter write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitEvent {
    pub code: String,
}

impl HitEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
