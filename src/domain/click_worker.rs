//! Background worker that applies click events to link counters.

use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Retries after the first failed increment.
const MAX_RETRIES: usize = 3;

/// Drains `rx` until every sender is dropped, incrementing click counters.
///
/// At most `concurrency` increments run at once. Each increment is retried
/// with jittered exponential backoff starting at 10ms; a click that still
/// fails is logged and dropped.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn LinkRepository>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            let _permit = permit;
            process_click(repository.as_ref(), &event).await;
        });
    }

    // Wait for in-flight increments before returning.
    let _ = permits.acquire_many(concurrency.max(1) as u32).await;
    debug!("Click worker stopped");
}

async fn process_click(repository: &dyn LinkRepository, event: &ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(5)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::spawn(strategy, || repository.record_click(&event.slug)).await;

    match result {
        Ok(true) => {
            metrics::counter!("clicks_recorded_total").increment(1);
        }
        Ok(false) => {
            debug!(slug = %event.slug, "Click for unknown slug ignored");
        }
        Err(e) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            warn!(slug = %event.slug, error = %e, "Failed to record click");
        }
    }
}
