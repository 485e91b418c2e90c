//! Realtime gateway: WebSocket upgrade and per-session forwarding.
//!
//! The channel lives at a single configured path (`/realtime` by
//! default). Each accepted connection subscribes to the
//! [`crate::domain::NotificationHub`] and receives every quote added
//! while it is open, one JSON object per text frame.

pub mod handler;
pub mod session;
