//! Observer Module
//!
//! Delivers hit, miss and evict notifications to the user callbacks, either
//! inline or through a background dispatcher task.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::config::{EvictCallback, HitCallback, MissCallback};

/// A notification queued for background delivery.
#[derive(Debug)]
pub(crate) enum Event<V> {
    Evict { key: String, value: V },
    Hit { key: String, value: V },
    Miss { key: String },
}

/// The user callbacks, each optional.
pub(crate) struct Callbacks<V> {
    pub(crate) on_evict: Option<EvictCallback<V>>,
    pub(crate) on_hit: Option<HitCallback<V>>,
    pub(crate) on_miss: Option<MissCallback>,
}

impl<V> Callbacks<V> {
    pub(crate) fn evict(&self, key: &str, value: &V) {
        if let Some(f) = &self.on_evict {
            f(key, value);
        }
    }

    pub(crate) fn hit(&self, key: &str, value: &V) {
        if let Some(f) = &self.on_hit {
            f(key, value);
        }
    }

    pub(crate) fn miss(&self, key: &str) {
        if let Some(f) = &self.on_miss {
            f(key);
        }
    }

    pub(crate) fn deliver(&self, event: Event<V>) {
        match event {
            Event::Evict { key, value } => self.evict(&key, &value),
            Event::Hit { key, value } => self.hit(&key, &value),
            Event::Miss { key } => self.miss(&key),
        }
    }
}

// == Observers ==
/// Routes notifications to the callbacks according to the dispatch mode.
pub(crate) struct Observers<V> {
    callbacks: Arc<Callbacks<V>>,
    /// Present in background mode
    queue: Option<UnboundedSender<Event<V>>>,
}

impl<V: Clone> Observers<V> {
    /// Observers that run callbacks on the calling thread.
    pub(crate) fn inline(callbacks: Arc<Callbacks<V>>) -> Self {
        Self {
            callbacks,
            queue: None,
        }
    }

    /// Observers that hand events to a dispatcher task.
    pub(crate) fn queued(callbacks: Arc<Callbacks<V>>, queue: UnboundedSender<Event<V>>) -> Self {
        Self {
            callbacks,
            queue: Some(queue),
        }
    }

    pub(crate) fn evicted(&self, key: &str, value: &V) {
        if self.callbacks.on_evict.is_none() {
            return;
        }
        match &self.queue {
            Some(queue) => self.enqueue(
                queue,
                Event::Evict {
                    key: key.to_string(),
                    value: value.clone(),
                },
            ),
            None => self.callbacks.evict(key, value),
        }
    }

    pub(crate) fn hit(&self, key: &str, value: &V) {
        if self.callbacks.on_hit.is_none() {
            return;
        }
        match &self.queue {
            Some(queue) => self.enqueue(
                queue,
                Event::Hit {
                    key: key.to_string(),
                    value: value.clone(),
                },
            ),
            None => self.callbacks.hit(key, value),
        }
    }

    pub(crate) fn missed(&self, key: &str) {
        if self.callbacks.on_miss.is_none() {
            return;
        }
        match &self.queue {
            Some(queue) => self.enqueue(
                queue,
                Event::Miss {
                    key: key.to_string(),
                },
            ),
            None => self.callbacks.miss(key),
        }
    }

    fn enqueue(&self, queue: &UnboundedSender<Event<V>>, event: Event<V>) {
        // Only fails if the dispatcher task died, i.e. a callback panicked.
        if queue.send(event).is_err() {
            warn!("Callback dispatcher is gone, dropping notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording() -> (Arc<Callbacks<u32>>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let callbacks = Callbacks {
            on_evict: Some(Arc::new(move |k: &str, v: &u32| {
                l1.lock().unwrap().push(format!("evict {k}={v}"))
            }) as EvictCallback<u32>),
            on_hit: Some(Arc::new(move |k: &str, v: &u32| {
                l2.lock().unwrap().push(format!("hit {k}={v}"))
            }) as HitCallback<u32>),
            on_miss: Some(Arc::new(move |k: &str| {
                l3.lock().unwrap().push(format!("miss {k}"))
            }) as MissCallback),
        };
        (Arc::new(callbacks), log)
    }

    #[test]
    fn test_inline_delivery() {
        let (callbacks, log) = recording();
        let observers = Observers::inline(callbacks);

        observers.hit("a", &1);
        observers.missed("b");
        observers.evicted("c", &3);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["hit a=1", "miss b", "evict c=3"]
        );
    }

    #[test]
    fn test_unset_callbacks_are_noops() {
        let callbacks = Arc::new(Callbacks::<u32> {
            on_evict: None,
            on_hit: None,
            on_miss: None,
        });
        let observers = Observers::inline(callbacks);

        observers.hit("a", &1);
        observers.missed("a");
        observers.evicted("a", &1);
    }

    #[test]
    fn test_queued_delivery_preserves_order() {
        let (callbacks, log) = recording();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let observers = Observers::queued(callbacks.clone(), tx);

        observers.missed("x");
        observers.evicted("y", &2);
        assert!(log.lock().unwrap().is_empty());

        while let Ok(event) = rx.try_recv() {
            callbacks.deliver(event);
        }
        assert_eq!(*log.lock().unwrap(), vec!["miss x", "evict y=2"]);
    }
}
