//! Process-wide bootstrap readiness flag.
//!
//! [`Readiness`] wraps a [`tokio::sync::watch`] channel holding a
//! [`BootstrapState`]. The bootstrapper flips it to `Ready` exactly once;
//! the quote store refuses work until then.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

/// Whether the backend schema and seed data are in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootstrapState {
    /// Setup scripts have not completed.
    NotReady,
    /// Both setup scripts succeeded. Terminal.
    Ready,
}

/// Shared handle to the [`BootstrapState`].
#[derive(Debug, Clone)]
pub struct Readiness {
    tx: Arc<watch::Sender<BootstrapState>>,
}

impl Readiness {
    /// Creates a handle in the `NotReady` state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(BootstrapState::NotReady);
        Self { tx: Arc::new(tx) }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> BootstrapState {
        *self.tx.borrow()
    }

    /// Returns `true` once bootstrap has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == BootstrapState::Ready
    }

    /// Transitions to `Ready`. Later calls have no effect.
    pub fn mark_ready(&self) {
        let changed = self.tx.send_if_modified(|state| {
            if *state == BootstrapState::Ready {
                false
            } else {
                *state = BootstrapState::Ready;
                true
            }
        });
        if changed {
            tracing::info!("bootstrap state is ready");
        }
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_ready() {
        let readiness = Readiness::new();
        assert_eq!(readiness.state(), BootstrapState::NotReady);
        assert!(!readiness.is_ready());
    }

    #[test]
    fn mark_ready_is_monotonic() {
        let readiness = Readiness::new();
        readiness.mark_ready();
        readiness.mark_ready();
        assert!(readiness.is_ready());
    }

    #[test]
    fn clones_share_state() {
        let readiness = Readiness::new();
        let clone = readiness.clone();
        readiness.mark_ready();
        assert!(clone.is_ready());
    }
}
