//! Type-safe realtime session identifier.
//!
//! [`SessionId`] is a newtype wrapper around [`uuid::Uuid`] (v4) so that
//! hub registrations cannot be confused with other identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one hub registration / realtime session.
///
/// Generated once when a subscriber registers and immutable thereafter.
/// Used as the key of the [`super::NotificationHub`] subscriber map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Creates a new random `SessionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn display_matches_uuid() {
        let id = SessionId::new();
        let parsed = uuid::Uuid::parse_str(&id.to_string());
        assert!(matches!(parsed, Ok(uuid) if uuid == id.0));
    }
}
