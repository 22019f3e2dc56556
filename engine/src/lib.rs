//! The Dial interaction engine.
//!
//! Everything that decides, for a given setting key, what value and
//! visibility it currently has, whether a pending mutation must be
//! validated, confirmed or applied immediately, and where keyboard focus
//! sits. The rendering layer and the host's value store are external
//! collaborators: the engine reads value snapshots and emits `(key, value)`
//! change requests through a sink, it never mutates host state directly.
//!
//! Layering, leaves first: pure evaluators ([`visibility`], [`validation`]),
//! the per-key mutation pipeline ([`Engine`]), the single pending
//! confirmation slot ([`confirm`]), the shared action busy arena
//! ([`actions`]) and the keyboard focus state machine ([`focus`]).

pub mod actions;
pub mod confirm;
mod engine;
pub mod focus;
pub mod hooks;
pub mod validation;
pub mod visibility;

pub use actions::ActionArena;
pub use confirm::{ConfirmState, PendingConfirm};
pub use engine::{Engine, EngineError};
pub use hooks::{ActionHandler, AsyncValidator, ChangeSink};
