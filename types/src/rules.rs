//! Validation rule sets attached to setting definitions.

use serde::Deserialize;

/// Type-appropriate validation rules for one setting.
///
/// Rule evaluation order is fixed by the engine: required first, then
/// length/range/date bounds, then pattern/membership. Date bounds are ISO
/// `YYYY-MM-DD` strings; the engine parses them at evaluation time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    /// Overrides the default message for pattern failures, including the
    /// malformed-pattern case.
    pub pattern_message: Option<String>,
    /// Membership rule: the value (or each list entry) must be one of these.
    pub options: Option<Vec<String>>,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

impl ValidationRules {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
