//! Domain events emitted after a quote mutation has been persisted.
//!
//! Every successful insert publishes a [`QuoteEvent`] through the
//! [`super::NotificationHub`]. Realtime sessions forward the carried
//! [`Quote`] to their clients.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Quote;

/// Topic name of [`QuoteEvent::QuoteAdded`].
pub const QUOTE_ADDED_TOPIC: &str = "quote-added";

/// Domain event emitted after a state mutation is durable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum QuoteEvent {
    /// A quote was inserted.
    QuoteAdded {
        /// The persisted quote, including its identifier.
        quote: Quote,
        /// Publication timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl QuoteEvent {
    /// Builds a `quote-added` event stamped with the current time.
    #[must_use]
    pub fn quote_added(quote: Quote) -> Self {
        Self::QuoteAdded {
            quote,
            timestamp: Utc::now(),
        }
    }

    /// Returns the topic this event is published under.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::QuoteAdded { .. } => QUOTE_ADDED_TOPIC,
        }
    }

    /// Returns the quote carried by this event.
    #[must_use]
    pub const fn quote(&self) -> &Quote {
        match self {
            Self::QuoteAdded { quote, .. } => quote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_added_topic() {
        let event = QuoteEvent::quote_added(Quote::from_row(1, "T".into(), "A".into()));
        assert_eq!(event.topic(), "quote-added");
        assert_eq!(event.quote().quote_id, Some(1));
    }

    #[test]
    fn serializes_with_event_type_tag() {
        let event = QuoteEvent::quote_added(Quote::from_row(1, "T".into(), "A".into()));
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["event_type"], "quote_added");
        assert_eq!(json["quote"]["text"], "T");
    }
}
