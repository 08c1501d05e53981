//! Callback Dispatcher
//!
//! Background task that delivers queued observer notifications in order.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

use crate::cache::observer::{Callbacks, Event};

/// Spawns the dispatcher on `runtime` and returns the queue feeding it.
///
/// The task exits once every sender is dropped, i.e. when the owning cache
/// and its evictor are gone.
pub(crate) fn spawn_dispatcher<V>(
    runtime: &Handle,
    callbacks: Arc<Callbacks<V>>,
) -> UnboundedSender<Event<V>>
where
    V: Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Event<V>>();

    runtime.spawn(async move {
        debug!("Callback dispatcher started");
        while let Some(event) = rx.recv().await {
            callbacks.deliver(event);
        }
        debug!("Callback dispatcher stopped");
    });

    tx
}
