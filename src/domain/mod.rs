//! Domain layer: quotes, events, readiness, and the notification hub.
//!
//! This module contains the server-side domain model: the quote entity
//! and its validated submission form, the `quote-added` event, the
//! bootstrap readiness flag, and the in-process hub that fans events out
//! to realtime sessions.

pub mod bootstrap_state;
pub mod notification_hub;
pub mod quote;
pub mod quote_event;
pub mod session_id;

pub use bootstrap_state::{BootstrapState, Readiness};
pub use notification_hub::{NotificationHub, Subscription};
pub use quote::{DEFAULT_AUTHOR, NewQuote, Quote};
pub use quote_event::QuoteEvent;
pub use session_id::SessionId;
