//! Core domain types for Dial.
//!
//! This crate holds the declarative settings schema and the value types the
//! interaction engine operates on. Raw deserialization structs (with loose
//! `Option` fields) stay private; the public types are resolved at the parse
//! boundary so that existence of a value is the proof of its validity.
//!
//! No IO, no async.

pub mod condition;
pub mod rules;
pub mod schema;
pub mod value;

pub use condition::{ConditionError, ConditionClause, Predicate, PredicateTest, VisibilityCondition};
pub use rules::ValidationRules;
pub use schema::{
    ActionItem, ChoiceOption, ConfirmConfig, Page, ResolvedSchema, Schema, SchemaError, Section,
    SettingDef, SettingKind,
};
pub use value::{SettingValue, ValueMap};
