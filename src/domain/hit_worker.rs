//! Background worker that applies redirect hits to the store.
//!
//! Hits are best effort: a full queue drops the event, and a failed increment is
//! logged and counted but never retried.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc, mpsc::error::TrySendError};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::UrlStore;

/// Enqueues a hit without waiting. Returns `false` if the event was dropped.
pub fn enqueue_hit(sender: &mpsc::Sender<HitEvent>, code: impl Into<String>) -> bool {
    match sender.try_send(HitEvent::new(code)) {
        Ok(()) => {
            metrics::counter!("urlsh_hits_enqueued_total").increment(1);
            true
        }
        Err(TrySendError::Full(event)) => {
            metrics::counter!("urlsh_hits_dropped_total").increment(1);
            warn!(code = %event.code, "Hit queue full, dropping hit");
            false
        }
        Err(TrySendError::Closed(event)) => {
            metrics::counter!("urlsh_hits_dropped_total").increment(1);
            warn!(code = %event.code, "Hit queue closed, dropping hit");
            false
        }
    }
}

/// Consumes hit events until every sender is dropped.
///
/// At most `concurrency` increments run at once. In-flight increments are
/// awaited before the function returns, so a shutdown drains the queue.
pub async fn run_hit_worker(
    mut rx: mpsc::Receiver<HitEvent>,
    store: Arc<dyn UrlStore>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let store = store.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            apply_hit(store.as_ref(), event).await;
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}
    info!("Hit worker stopped");
}

async fn apply_hit(store: &dyn UrlStore, event: HitEvent) {
    match store.increment_hit(&event.code).await {
        Ok(()) => debug!(code = %event.code, "Hit recorded"),
        Err(e) => {
            metrics::counter!("urlsh_hits_failed_total").increment(1);
            warn!(code = %event.code, error = %e, "Failed to record hit");
        }
    }
}
