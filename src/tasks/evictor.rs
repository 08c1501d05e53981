//! Background Evictor
//!
//! Background task that periodically removes stale cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::cache::store::Store;

/// Handle to a running evictor task.
///
/// The task stops when [`stop`](Evictor::stop) is called or the handle is
/// dropped.
#[derive(Debug)]
pub(crate) struct Evictor {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Evictor {
    /// Spawns the evictor on `runtime`, sweeping `store` every `interval`.
    ///
    /// The first sweep happens one full interval after start.
    pub(crate) fn start<V>(runtime: &Handle, store: Arc<Store<V>>, interval: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = runtime.spawn(evict_loop(store, interval, shutdown_rx));

        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "Starting background evictor"
        );

        Self { shutdown_tx, task }
    }

    /// Signals the task to stop. Only the first call has an effect.
    pub(crate) fn stop(&self) {
        let signalled = self.shutdown_tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });
        if signalled {
            info!("Background evictor stopped");
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Evictor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn evict_loop<V>(
    store: Arc<Store<V>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    V: Clone + Send + Sync + 'static,
{
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Evictor received shutdown signal");
                    return;
                }
            }
        }

        let removed = store.remove_expired();

        if removed > 0 {
            debug!(
                removed = removed,
                remaining = store.len(),
                "Evicted stale entries"
            );
        } else {
            trace!("No stale entries found");
        }
    }
}
