//! # qotd-gateway
//!
//! Quote-of-the-day service: a REST API for reading and submitting quotes
//! and a WebSocket channel that pushes every newly added quote to all
//! connected clients in real time.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)        GET/POST /quotes, GET /health
//!     ├── Realtime Gateway (ws/)      /realtime
//!     │
//!     ├── QuoteService (service/)     persist → publish
//!     ├── NotificationHub (domain/)   per-session bounded queues
//!     │
//!     ├── QuoteStore (persistence/)
//!     ├── Bootstrapper (persistence/) schema → seed, before serving
//!     │
//!     └── SQLite (sqlx pool)
//! ```
//!
//! [`server::Gateway::prepare`] runs the bootstrap scripts to completion
//! before a listener can be attached, so no request ever observes a
//! partially initialized database.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod ws;
