//! Per-action busy tracking, shared by identity.
//!
//! One authoritative busy flag per action identity, held in an arena behind
//! a cheaply cloneable handle. Every simultaneously rendered observer of the
//! same action key clones the handle and therefore observes the same flag;
//! there is no per-observer copy to diverge.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared busy arena. `Clone` hands out another view of the same state.
#[derive(Debug, Clone, Default)]
pub struct ActionArena {
    busy: Arc<Mutex<HashSet<String>>>,
}

impl ActionArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an invocation for `id` is currently in flight.
    #[must_use]
    pub fn is_loading(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    /// Run `handler` for action `id`, at most one in flight per identity.
    ///
    /// A call while `id` is already busy is ignored (never queued). A
    /// failing handler is logged with the action key and the busy flag is
    /// cleared either way; the failure is not re-thrown to the caller.
    /// Returns whether the handler actually ran.
    pub async fn invoke<F>(&self, id: &str, handler: F) -> bool
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        if !self.begin(id) {
            tracing::debug!(action = id, "invocation ignored, already in flight");
            return false;
        }
        tracing::debug!(action = id, "invocation started");
        if let Err(error) = handler.await {
            tracing::warn!(action = id, error = %error, "action handler failed");
        }
        self.finish(id);
        true
    }

    fn begin(&self, id: &str) -> bool {
        self.lock().insert(id.to_string())
    }

    fn finish(&self, id: &str) {
        self.lock().remove(id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
