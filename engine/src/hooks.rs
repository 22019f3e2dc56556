//! Host callback boundary.
//!
//! The engine never mutates host state: applied mutations leave through the
//! [`ChangeSink`], and the host may plug in an [`AsyncValidator`] that
//! `validate()` consults after synchronous rules pass.

use dial_types::SettingValue;
use futures_util::future::BoxFuture;

/// Change-emission callback: `(key, value)` on every applied mutation.
pub type ChangeSink = Box<dyn Fn(&str, &SettingValue) + Send>;

/// Asynchronous validator: `(key, current value)` to an error message, or
/// `None` when the value is acceptable.
pub type AsyncValidator =
    Box<dyn Fn(&str, Option<&SettingValue>) -> BoxFuture<'static, Option<String>> + Send>;

/// Action-invocation callback: `(action identity)` to the work to run.
/// Shared so every rendered observer can invoke through the same handler.
pub type ActionHandler =
    std::sync::Arc<dyn Fn(&str) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;
