//! Visibility condition tree.
//!
//! A condition is a single predicate, an ordered list of clauses (implicit
//! AND), or an `{ or = [...] }` group nested inside such a list. Each
//! predicate names a setting and carries exactly zero or one operator; that
//! invariant is enforced at the deserialization boundary.

use serde::Deserialize;

use crate::value::SettingValue;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConditionError {
    #[error("predicate for `{setting}` carries {count} operators; exactly zero or one allowed")]
    MultipleOperators { setting: String, count: usize },
}

/// The test one predicate applies to the referenced setting's value.
///
/// `Truthy` is the operator-less fallback: the value is treated like a
/// boolean test.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateTest {
    Truthy,
    Equals(SettingValue),
    NotEquals(SettingValue),
    OneOf(Vec<SettingValue>),
    GreaterThan(f64),
    LessThan(f64),
    Contains(String),
    IsEmpty(bool),
}

#[derive(Deserialize)]
struct RawPredicate {
    setting: String,
    equals: Option<SettingValue>,
    not_equals: Option<SettingValue>,
    one_of: Option<Vec<SettingValue>>,
    greater_than: Option<f64>,
    less_than: Option<f64>,
    contains: Option<String>,
    is_empty: Option<bool>,
}

/// One visibility predicate: a referenced setting plus its test.
///
/// Invariant: exactly zero or one operator (enforced via `try_from` at the
/// deserialization boundary).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawPredicate")]
pub struct Predicate {
    setting: String,
    test: PredicateTest,
}

impl TryFrom<RawPredicate> for Predicate {
    type Error = ConditionError;

    fn try_from(raw: RawPredicate) -> Result<Self, Self::Error> {
        let mut tests = Vec::new();
        if let Some(v) = raw.equals {
            tests.push(PredicateTest::Equals(v));
        }
        if let Some(v) = raw.not_equals {
            tests.push(PredicateTest::NotEquals(v));
        }
        if let Some(v) = raw.one_of {
            tests.push(PredicateTest::OneOf(v));
        }
        if let Some(v) = raw.greater_than {
            tests.push(PredicateTest::GreaterThan(v));
        }
        if let Some(v) = raw.less_than {
            tests.push(PredicateTest::LessThan(v));
        }
        if let Some(v) = raw.contains {
            tests.push(PredicateTest::Contains(v));
        }
        if let Some(v) = raw.is_empty {
            tests.push(PredicateTest::IsEmpty(v));
        }

        if tests.len() > 1 {
            return Err(ConditionError::MultipleOperators {
                setting: raw.setting,
                count: tests.len(),
            });
        }

        Ok(Self {
            setting: raw.setting,
            test: tests.pop().unwrap_or(PredicateTest::Truthy),
        })
    }
}

impl Predicate {
    #[must_use]
    pub fn new(setting: impl Into<String>, test: PredicateTest) -> Self {
        Self {
            setting: setting.into(),
            test,
        }
    }

    #[must_use]
    pub fn setting(&self) -> &str {
        &self.setting
    }

    #[must_use]
    pub fn test(&self) -> &PredicateTest {
        &self.test
    }
}

/// One clause inside an AND list: either a bare predicate or an OR group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConditionClause {
    Any {
        or: Vec<Predicate>,
    },
    One(Predicate),
}

/// A whole visibility condition: single predicate or AND list of clauses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VisibilityCondition {
    All(Vec<ConditionClause>),
    Single(Predicate),
}

impl VisibilityCondition {
    /// Every setting key this condition references, for schema resolution.
    pub fn referenced_settings(&self) -> impl Iterator<Item = &str> {
        let mut keys = Vec::new();
        match self {
            Self::Single(p) => keys.push(p.setting()),
            Self::All(clauses) => {
                for clause in clauses {
                    match clause {
                        ConditionClause::One(p) => keys.push(p.setting()),
                        ConditionClause::Any { or } => {
                            keys.extend(or.iter().map(Predicate::setting));
                        }
                    }
                }
            }
        }
        keys.into_iter()
    }
}
