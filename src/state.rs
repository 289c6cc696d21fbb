//! Shared application state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::hit_event::HitEvent;

/// Handler state. Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub hit_sender: mpsc::Sender<HitEvent>,
    /// Origin for short URLs. `None` derives it from the request.
    pub public_base_url: Option<String>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        hit_sender: mpsc::Sender<HitEvent>,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            link_service,
            hit_sender,
            public_base_url,
        }
    }
}
