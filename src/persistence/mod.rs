//! Persistence layer: SQLite connection source, bootstrap, quote store.
//!
//! All access goes through short-lived connections borrowed from an
//! `sqlx::SqlitePool`. The bootstrapper prepares the schema once at
//! startup; the quote store serves per-request reads and inserts.

pub mod bootstrap;
pub mod connection;
pub mod quote_store;

pub use bootstrap::{BootstrapStep, Bootstrapper, ScriptSource};
pub use connection::{Connection, ConnectionSource};
pub use quote_store::QuoteStore;
