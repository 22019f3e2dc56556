//! The single process-wide pending-confirmation slot.
//!
//! A tagged-variant state rather than a boolean plus side fields, so a
//! "pending but no candidate" state is not representable.

use dial_types::{ConfirmConfig, SettingValue};

/// A mutation intercepted by a confirmation gate, waiting for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirm {
    pub key: String,
    pub candidate: SettingValue,
    pub config: ConfirmConfig,
}

/// At most one confirmation may be pending at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfirmState {
    #[default]
    Idle,
    Pending(PendingConfirm),
}

impl ConfirmState {
    /// Park a gated mutation. A previously pending confirmation for any key
    /// is discarded without applying.
    pub fn begin(&mut self, pending: PendingConfirm) {
        if let Self::Pending(previous) = self {
            tracing::debug!(
                discarded = %previous.key,
                replaced_by = %pending.key,
                "pending confirmation replaced"
            );
        }
        *self = Self::Pending(pending);
    }

    /// Clear the slot, returning the pending mutation if there was one.
    /// Resolving while idle is a no-op.
    pub fn resolve(&mut self) -> Option<PendingConfirm> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Pending(pending) => Some(pending),
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingConfirm> {
        match self {
            Self::Idle => None,
            Self::Pending(pending) => Some(pending),
        }
    }

    #[must_use]
    pub fn is_pending_for(&self, key: &str) -> bool {
        self.pending().is_some_and(|pending| pending.key == key)
    }
}
