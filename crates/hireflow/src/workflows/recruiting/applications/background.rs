use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, Notify, Semaphore};
use tracing::{debug, warn};

use super::domain::ApplicationId;

/// Detached worker pool for post-persistence side effects.
///
/// Jobs for the same application never overlap;
/// jobs for different applications run concurrently, bounded by the worker count.
#[derive(Clone)]
pub struct BackgroundQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    workers: Semaphore,
    locks: Mutex<HashMap<ApplicationId, Arc<AsyncMutex<()>>>>,
    in_flight: AtomicUsize,
    idle: Notify,
}

impl BackgroundQueue {
    pub fn new(workers: usize) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                workers: Semaphore::new(workers.max(1)),
                locks: Mutex::new(HashMap::new()),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        }
    }

    /// Schedules `job` for `id` without waiting for it. Must be called inside a Tokio runtime.
    pub fn spawn<F>(&self, id: ApplicationId, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let inner = self.inner.clone();
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        let lock = inner.lock_for(&id);

        tokio::spawn(async move {
            {
                let _serial = lock.lock().await;
                match inner.workers.acquire().await {
                    // A panicking job must not skip the bookkeeping below.
                    Ok(_permit) => {
                        if let Err(err) = tokio::spawn(job).await {
                            warn!(application_id = %id, error = %err, "background job aborted");
                        }
                    }
                    Err(err) => warn!(application_id = %id, error = %err, "worker pool closed"),
                }
            }
            drop(lock);
            inner.release_lock(&id);
            debug!(application_id = %id, "background job finished");

            if inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                inner.idle.notify_waiters();
            }
        });
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub(crate) fn tracked_applications(&self) -> usize {
        self.inner
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Resolves once every scheduled job has finished.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl QueueInner {
    fn lock_for(&self, id: &ApplicationId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn release_lock(&self, id: &ApplicationId) {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(lock) = locks.get(id) {
            // Only the map still holds it: no queued job for this application.
            if Arc::strong_count(lock) == 1 {
                locks.remove(id);
            }
        }
    }
}
