//! Visibility condition evaluation.
//!
//! Pure functions over the schema and the current value snapshot. Evaluated
//! fresh on every render; nothing here caches. A referenced setting is read
//! the same way `getValue` reads it: explicit value, else schema default. A
//! reference that resolves to nothing (no value *and* no default) simply
//! does not match, whatever the operator: unknown references are a
//! schema-authoring error caught at resolve time, not here. Conditions that
//! transitively depend on their own setting are left as authored (no cycle
//! detection).

use dial_types::{
    ConditionClause, Predicate, PredicateTest, ResolvedSchema, SettingValue, ValueMap,
};

/// Evaluate a whole condition: AND over clauses, OR within `or` groups.
///
/// `None` (no condition) is always visible.
#[must_use]
pub fn is_visible(
    condition: Option<&dial_types::VisibilityCondition>,
    schema: &ResolvedSchema,
    values: &ValueMap,
) -> bool {
    use dial_types::VisibilityCondition;

    let Some(condition) = condition else {
        return true;
    };
    match condition {
        VisibilityCondition::Single(predicate) => matches(predicate, schema, values),
        VisibilityCondition::All(clauses) => clauses.iter().all(|clause| match clause {
            ConditionClause::One(predicate) => matches(predicate, schema, values),
            ConditionClause::Any { or } => {
                or.iter().any(|predicate| matches(predicate, schema, values))
            }
        }),
    }
}

/// Evaluate one predicate against the resolved value of its referenced
/// setting (explicit value, else schema default).
#[must_use]
pub fn matches(predicate: &Predicate, schema: &ResolvedSchema, values: &ValueMap) -> bool {
    let Some(value) = resolve(schema, values, predicate.setting()) else {
        return false;
    };
    match predicate.test() {
        PredicateTest::Truthy => value.truthy(),
        PredicateTest::Equals(expected) => value == expected,
        PredicateTest::NotEquals(expected) => value != expected,
        PredicateTest::OneOf(allowed) => allowed.contains(value),
        PredicateTest::GreaterThan(bound) => value.as_number().is_some_and(|n| n > *bound),
        PredicateTest::LessThan(bound) => value.as_number().is_some_and(|n| n < *bound),
        PredicateTest::Contains(needle) => match value {
            SettingValue::Text(s) => s.contains(needle.as_str()),
            SettingValue::List(items) => items.iter().any(|item| item == needle),
            SettingValue::Bool(_) | SettingValue::Number(_) => false,
        },
        PredicateTest::IsEmpty(expected) => value.is_empty() == *expected,
    }
}

fn resolve<'a>(
    schema: &'a ResolvedSchema,
    values: &'a ValueMap,
    key: &str,
) -> Option<&'a SettingValue> {
    values
        .get(key)
        .or_else(|| schema.setting(key).and_then(|def| def.default.as_ref()))
}
