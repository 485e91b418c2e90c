//! Data Transfer Objects for REST request/response serialization.
//!
//! Responses reuse the domain [`crate::domain::Quote`] directly, since
//! its JSON shape is the wire shape.

pub mod quote_dto;

pub use quote_dto::*;
