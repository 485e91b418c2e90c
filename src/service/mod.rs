//! Service layer: business logic orchestration.
//!
//! [`QuoteService`] sequences quote store writes before hub publication
//! and is shared by the REST handlers and the realtime gateway.

pub mod quote_service;

pub use quote_service::QuoteService;
