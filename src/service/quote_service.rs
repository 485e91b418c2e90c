//! Quote service: orchestrates store operations and emits events.

use crate::domain::{NewQuote, NotificationHub, Quote, QuoteEvent};
use crate::error::StoreError;
use crate::persistence::QuoteStore;

/// Orchestration layer for quote reads and writes.
///
/// Stateless coordinator: owns a [`QuoteStore`] for persistence and a
/// [`NotificationHub`] for event emission. Writes follow the pattern:
/// persist → publish → return. Nothing is published for a write that
/// did not persist.
#[derive(Debug, Clone)]
pub struct QuoteService {
    store: QuoteStore,
    hub: NotificationHub,
}

impl QuoteService {
    /// Creates a new `QuoteService`.
    #[must_use]
    pub fn new(store: QuoteStore, hub: NotificationHub) -> Self {
        Self { store, hub }
    }

    #[cfg(test)]
    pub(crate) fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// Returns every stored quote in backend order.
    ///
    /// # Errors
    ///
    /// Propagates the [`StoreError`] of the read.
    pub async fn list_quotes(&self) -> Result<Vec<Quote>, StoreError> {
        self.store.list_all().await
    }

    /// Persists a quote and then announces it to realtime subscribers.
    ///
    /// # Errors
    ///
    /// Propagates the [`StoreError`] of the insert; no event is published
    /// in that case.
    pub async fn add_quote(&self, quote: NewQuote) -> Result<Quote, StoreError> {
        let persisted = self.store.insert(&quote).await?;

        let delivered = self.hub.publish(QuoteEvent::quote_added(persisted.clone()));

        tracing::info!(
            quote_id = persisted.quote_id,
            author = %persisted.author,
            delivered,
            "quote added"
        );
        Ok(persisted)
    }

    /// Returns the most recently inserted quote, if any.
    ///
    /// # Errors
    ///
    /// Propagates the [`StoreError`] of the read.
    pub async fn latest_quote(&self) -> Result<Option<Quote>, StoreError> {
        self.store.latest().await
    }
}
