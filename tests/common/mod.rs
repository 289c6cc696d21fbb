#![allow(dead_code)]

use std::sync::Arc;
use tokio::sync::mpsc;
use urlsh::application::services::LinkService;
use urlsh::domain::hit_event::HitEvent;
use urlsh::domain::repositories::UrlStore;
use urlsh::infrastructure::persistence::MemoryUrlStore;
use urlsh::state::AppState;
use urlsh::utils::code_generator::RandomCodeGenerator;

pub fn create_test_store() -> Arc<MemoryUrlStore> {
    Arc::new(MemoryUrlStore::new())
}

pub fn create_test_state_with(
    store: Arc<dyn UrlStore>,
    queue_capacity: usize,
    public_base_url: Option<&str>,
) -> (AppState, mpsc::Receiver<HitEvent>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let link_service = Arc::new(LinkService::new(store, Arc::new(RandomCodeGenerator)));

    let state = AppState::new(link_service, tx, public_base_url.map(str::to_string));

    (state, rx)
}

pub fn create_test_state(store: Arc<dyn UrlStore>) -> (AppState, mpsc::Receiver<HitEvent>) {
    create_test_state_with(store, 100, None)
}

pub async fn create_test_link(store: &dyn UrlStore, code: &str, url: &str) {
    store.put(code, url).await.unwrap();
}
