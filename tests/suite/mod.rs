//! Integration test modules.

mod actions;
mod focus;
mod pipeline;
mod schema;
