//! Synchronous validation of candidate values.
//!
//! Fixed precedence, first failing rule wins: required, then length/range/
//! date bounds, then pattern/membership. An absent value only ever fails the
//! required rule; every other rule passes vacuously.

use chrono::NaiveDate;
use dial_types::{SettingDef, SettingValue, ValidationRules};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MSG_REQUIRED: &str = "This field is required";
pub const MSG_INVALID_PATTERN: &str = "Invalid validation pattern";
pub const MSG_INVALID_FORMAT: &str = "Invalid format";
pub const MSG_INVALID_DATE: &str = "Invalid date";
pub const MSG_NOT_AN_OPTION: &str = "Must be one of the allowed options";

/// Run the definition's rule set against `value`.
///
/// Returns the first failing rule's message, or `None` when the value is
/// acceptable. Definitions without rules accept everything.
#[must_use]
pub fn check(def: &SettingDef, value: Option<&SettingValue>) -> Option<String> {
    let rules = def.rules.as_ref()?;

    if rules.required && value.is_none_or(SettingValue::is_empty) {
        return Some(MSG_REQUIRED.to_string());
    }
    let Some(value) = value else {
        return None;
    };

    check_bounds(rules, value).or_else(|| check_membership(rules, value))
}

fn check_bounds(rules: &ValidationRules, value: &SettingValue) -> Option<String> {
    if let Some(text) = value.as_text() {
        if let Some(min) = rules.min_length {
            if text.chars().count() < min {
                return Some(format!("Must be at least {min} characters"));
            }
        }
        if let Some(max) = rules.max_length {
            if text.chars().count() > max {
                return Some(format!("Must be at most {max} characters"));
            }
        }
    }

    if let Some(number) = value.as_number() {
        if let Some(min) = rules.min {
            if number < min {
                return Some(format!("Must be at least {min}"));
            }
        }
        if let Some(max) = rules.max {
            if number > max {
                return Some(format!("Must be at most {max}"));
            }
        }
    }

    if rules.min_date.is_some() || rules.max_date.is_some() {
        if let Some(text) = value.as_text() {
            let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) else {
                return Some(MSG_INVALID_DATE.to_string());
            };
            if let Some(bound) = parse_bound(rules.min_date.as_deref()) {
                if date < bound {
                    return Some(format!("Must be on or after {}", bound.format(DATE_FORMAT)));
                }
            }
            if let Some(bound) = parse_bound(rules.max_date.as_deref()) {
                if date > bound {
                    return Some(format!("Must be on or before {}", bound.format(DATE_FORMAT)));
                }
            }
        }
    }

    None
}

fn check_membership(rules: &ValidationRules, value: &SettingValue) -> Option<String> {
    if let Some(pattern) = rules.pattern.as_deref() {
        if let Some(text) = value.as_text() {
            match regex::Regex::new(pattern) {
                // A malformed pattern is itself a validation failure.
                Err(_) => {
                    return Some(
                        rules
                            .pattern_message
                            .clone()
                            .unwrap_or_else(|| MSG_INVALID_PATTERN.to_string()),
                    );
                }
                Ok(re) if !re.is_match(text) => {
                    return Some(
                        rules
                            .pattern_message
                            .clone()
                            .unwrap_or_else(|| MSG_INVALID_FORMAT.to_string()),
                    );
                }
                Ok(_) => {}
            }
        }
    }

    if let Some(options) = rules.options.as_deref() {
        let allowed = |entry: &str| options.iter().any(|option| option == entry);
        let ok = match value {
            SettingValue::Text(text) => allowed(text),
            SettingValue::List(items) => items.iter().all(|item| allowed(item)),
            SettingValue::Bool(_) | SettingValue::Number(_) => true,
        };
        if !ok {
            return Some(MSG_NOT_AN_OPTION.to_string());
        }
    }

    None
}

fn parse_bound(bound: Option<&str>) -> Option<NaiveDate> {
    // An unparseable bound is schema-author noise; skip the rule rather
    // than failing every candidate.
    NaiveDate::parse_from_str(bound?, DATE_FORMAT).ok()
}
