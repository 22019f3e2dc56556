//! Per-key value resolution and the mutation pipeline.
//!
//! Ordering guarantees, per `set_value`: validate, then confirm, then apply.
//! A validation failure is always recorded as the key's current error; a
//! confirmation gate defers the emission instead of blocking on the failure
//! (the two concerns compose through the confirmation slot). `validate()`
//! runs synchronous rules first and consults the async validator only when
//! they pass, and is suppressed entirely while a confirmation for the same
//! key is pending.

use std::collections::HashMap;

use dial_types::{ResolvedSchema, SettingDef, SettingValue, ValueMap};

use crate::actions::ActionArena;
use crate::confirm::{ConfirmState, PendingConfirm};
use crate::hooks::{AsyncValidator, ChangeSink};
use crate::{validation, visibility};

/// Configuration errors: wiring mistakes, not data problems. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no setting `{0}` in the active schema (accessor used outside its schema context)")]
    UnknownKey(String),
}

/// The interaction engine for one loaded schema.
///
/// Reads the host's [`ValueMap`] as a fresh snapshot on every call and never
/// caches it; applied mutations leave through the change sink.
pub struct Engine {
    schema: ResolvedSchema,
    errors: HashMap<String, String>,
    confirm: ConfirmState,
    on_change: ChangeSink,
    async_validator: Option<AsyncValidator>,
    actions: ActionArena,
}

impl Engine {
    #[must_use]
    pub fn new(schema: ResolvedSchema, on_change: ChangeSink) -> Self {
        Self {
            schema,
            errors: HashMap::new(),
            confirm: ConfirmState::default(),
            on_change,
            async_validator: None,
            actions: ActionArena::new(),
        }
    }

    #[must_use]
    pub fn with_async_validator(mut self, validator: AsyncValidator) -> Self {
        self.async_validator = Some(validator);
        self
    }

    #[must_use]
    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    /// Handle to the shared busy arena; clone it per observer.
    #[must_use]
    pub fn actions(&self) -> &ActionArena {
        &self.actions
    }

    fn def(&self, key: &str) -> Result<&SettingDef, EngineError> {
        self.schema
            .setting(key)
            .ok_or_else(|| EngineError::UnknownKey(key.to_string()))
    }

    /// Current value: explicit value, else schema default, else absent.
    pub fn value<'a>(
        &'a self,
        values: &'a ValueMap,
        key: &str,
    ) -> Result<Option<&'a SettingValue>, EngineError> {
        let def = self.def(key)?;
        Ok(values.get(key).or(def.default.as_ref()))
    }

    pub fn is_visible(&self, values: &ValueMap, key: &str) -> Result<bool, EngineError> {
        let def = self.def(key)?;
        Ok(visibility::is_visible(
            def.visible_if.as_ref(),
            &self.schema,
            values,
        ))
    }

    /// The key's current validation error, if any.
    #[must_use]
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn clear_error(&mut self, key: &str) {
        self.errors.remove(key);
    }

    /// Attempt a mutation: validate, then confirm, then apply.
    ///
    /// No-op for readonly or disabled settings. A failing candidate has its
    /// message recorded either way; it only blocks the emission when no
    /// confirmation gate is configured.
    pub fn set_value(&mut self, key: &str, candidate: SettingValue) -> Result<(), EngineError> {
        let def = self.def(key)?;
        if def.readonly || def.disabled {
            return Ok(());
        }
        let failure = validation::check(def, Some(&candidate));
        let gate = def.confirm.clone();

        match &failure {
            Some(message) => {
                self.errors.insert(key.to_string(), message.clone());
            }
            None => {
                self.errors.remove(key);
            }
        }

        if let Some(config) = gate {
            self.confirm.begin(PendingConfirm {
                key: key.to_string(),
                candidate,
                config,
            });
            return Ok(());
        }

        if failure.is_some() {
            return Ok(());
        }

        (self.on_change)(key, &candidate);
        Ok(())
    }

    /// Re-validate the key's *current* value.
    ///
    /// Synchronous rules run first; the external async validator is only
    /// consulted when they pass. Suppressed while a confirmation for the
    /// same key is pending, so the recorded error never contradicts the
    /// not-yet-applied candidate.
    pub async fn validate(&mut self, values: &ValueMap, key: &str) -> Result<(), EngineError> {
        if self.confirm.is_pending_for(key) {
            return Ok(());
        }

        let current = self.value(values, key)?.cloned();
        let def = self.def(key)?;
        if let Some(message) = validation::check(def, current.as_ref()) {
            self.errors.insert(key.to_string(), message);
            return Ok(());
        }
        self.errors.remove(key);

        let pending = self
            .async_validator
            .as_ref()
            .map(|validator| validator(key, current.as_ref()));
        if let Some(future) = pending {
            if let Some(message) = future.await {
                self.errors.insert(key.to_string(), message);
            }
        }
        Ok(())
    }

    /// The currently pending confirmation, if any.
    #[must_use]
    pub fn pending_confirm(&self) -> Option<&PendingConfirm> {
        self.confirm.pending()
    }

    /// Accept or reject the pending confirmation. No-op while idle.
    pub fn resolve_confirm(&mut self, accepted: bool) {
        if let Some(pending) = self.confirm.resolve() {
            if accepted {
                (self.on_change)(&pending.key, &pending.candidate);
            }
        }
    }
}
