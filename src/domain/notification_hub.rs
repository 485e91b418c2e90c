//! In-process fan-out of [`QuoteEvent`]s to realtime sessions.
//!
//! [`NotificationHub`] keeps one bounded [`tokio::sync::mpsc`] queue per
//! subscriber. Publishing walks the registered senders under a read lock
//! and uses `try_send`, so the publisher never waits on a subscriber and
//! one full or closed queue never affects the others. Each subscriber
//! drains its own queue in its own task.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::{QuoteEvent, SessionId};

/// Default per-subscriber queue capacity.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 1024;

#[derive(Debug)]
struct HubInner {
    subscribers: RwLock<HashMap<SessionId, mpsc::Sender<QuoteEvent>>>,
    capacity: usize,
    closed: AtomicBool,
}

/// Broadcast point for `quote-added` events.
///
/// Cheap to clone; all clones share one subscriber set. Events published
/// sequentially reach each subscriber in publication order. Subscribers
/// registered after a publish never see that event.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    inner: Arc<HubInner>,
}

impl NotificationHub {
    /// Creates a hub whose subscriber queues hold up to `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                subscribers: RwLock::new(HashMap::new()),
                capacity: capacity.max(1),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Registers a new subscriber.
    ///
    /// The returned [`Subscription`] deregisters itself when dropped. On a
    /// closed hub the subscription is created already at end-of-stream.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let id = SessionId::new();
        let (tx, rx) = mpsc::channel(self.inner.capacity);
        {
            let mut subscribers = self
                .inner
                .subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if !self.inner.closed.load(Ordering::Acquire) {
                subscribers.insert(id, tx);
            }
        }
        tracing::debug!(session_id = %id, "hub subscriber registered");
        Subscription {
            id,
            receiver: rx,
            hub: self.clone(),
        }
    }

    /// Delivers `event` to every subscriber registered right now.
    ///
    /// Returns the number of subscriber queues that accepted the event.
    /// A full queue drops the event for that subscriber only; a closed
    /// queue is pruned from the set.
    pub fn publish(&self, event: QuoteEvent) -> usize {
        let mut delivered = 0;
        let mut disconnected = Vec::new();
        {
            let subscribers = self
                .inner
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            for (id, tx) in subscribers.iter() {
                match tx.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(session_id = %id, topic = event.topic(), "subscriber queue full, event dropped");
                    }
                    Err(TrySendError::Closed(_)) => disconnected.push(*id),
                }
            }
        }
        for id in disconnected {
            self.unsubscribe(id);
        }
        tracing::debug!(topic = event.topic(), delivered, "event published");
        delivered
    }

    /// Removes a subscriber.
    ///
    /// Returns `true` if it was registered. Removing an unknown or already
    /// removed subscriber is a no-op that returns `false`.
    pub fn unsubscribe(&self, id: SessionId) -> bool {
        let removed = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            tracing::debug!(session_id = %id, "hub subscriber removed");
        }
        removed
    }

    /// Returns the current number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every registration and refuses new ones.
    ///
    /// Live subscriptions drain what is already queued and then observe
    /// end-of-stream.
    pub fn close(&self) {
        let dropped = {
            let mut subscribers = self
                .inner
                .subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            self.inner.closed.store(true, Ordering::Release);
            let n = subscribers.len();
            subscribers.clear();
            n
        };
        tracing::info!(dropped, "notification hub closed");
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}

/// One registration with the [`NotificationHub`].
///
/// Dropping the subscription removes the registration, so every exit path
/// of the owning session releases it.
#[derive(Debug)]
pub struct Subscription {
    id: SessionId,
    receiver: mpsc::Receiver<QuoteEvent>,
    hub: NotificationHub,
}

impl Subscription {
    /// Identifier of this registration.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the registration has been removed (explicitly
    /// or by hub shutdown) and the queue is drained.
    pub async fn recv(&mut self) -> Option<QuoteEvent> {
        self.receiver.recv().await
    }

    /// Returns an already queued event without waiting.
    #[cfg(test)]
    pub(crate) fn try_recv(&mut self) -> Option<QuoteEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
