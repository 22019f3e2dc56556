//! The declarative settings schema: pages, sections, setting definitions.
//!
//! A `Schema` is what the host authors (typically in TOML). The engine never
//! consumes it directly; it consumes a `ResolvedSchema`, produced by
//! [`Schema::resolve`], which has checked key uniqueness, visibility
//! references and default types. Resolution happens once at load time;
//! definitions are immutable afterwards and referenced, never copied.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::condition::VisibilityCondition;
use crate::rules::ValidationRules;
use crate::value::SettingValue;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate setting key `{0}`")]
    DuplicateKey(String),
    #[error("duplicate sub-item key `{item}` inside `{setting}`")]
    DuplicateItemKey { setting: String, item: String },
    #[error("visibility condition on `{setting}` references unknown setting `{referenced}`")]
    UnknownVisibilityRef { setting: String, referenced: String },
    #[error("default value for `{key}` does not match its `{kind:?}` kind")]
    DefaultTypeMismatch { key: String, kind: SettingKind },
    #[error("duplicate page key `{0}`")]
    DuplicatePageKey(String),
}

/// Type tag for a setting definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingKind {
    Bool,
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Action,
}

impl SettingKind {
    /// Whether `value` is an acceptable shape for this kind.
    #[must_use]
    pub fn accepts(self, value: &SettingValue) -> bool {
        match self {
            Self::Bool => matches!(value, SettingValue::Bool(_)),
            Self::Number => matches!(value, SettingValue::Number(_)),
            Self::Text | Self::Select | Self::Date => matches!(value, SettingValue::Text(_)),
            Self::MultiSelect => matches!(value, SettingValue::List(_)),
            Self::Action => false,
        }
    }
}

/// One selectable option of a select or multi-select setting.
///
/// For multi-selects each option renders as a checkbox; `hidden` removes it
/// from keyboard navigation and assistive technology without removing it
/// from the schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub hidden: bool,
}

/// One button of a multi-button action setting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionItem {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub dangerous: bool,
}

/// Confirmation gate configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfirmConfig {
    pub message: String,
    #[serde(default)]
    pub confirm_label: Option<String>,
    #[serde(default)]
    pub cancel_label: Option<String>,
}

/// One setting definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SettingDef {
    pub key: String,
    pub label: String,
    pub kind: SettingKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default: Option<SettingValue>,
    #[serde(default)]
    pub visible_if: Option<VisibilityCondition>,
    #[serde(default)]
    pub rules: Option<ValidationRules>,
    #[serde(default)]
    pub confirm: Option<ConfirmConfig>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub dangerous: bool,
    /// Options for select/multi-select kinds.
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    /// Sub-buttons for multi-button action kinds. Item keys are unique only
    /// within this group.
    #[serde(default)]
    pub items: Vec<ActionItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub settings: Vec<SettingDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// The raw, as-authored schema tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Schema {
    /// Validate the tree and build the key index.
    ///
    /// Checks: setting keys unique across the whole schema (sub-item keys
    /// unique per group only), page keys unique, visibility conditions only
    /// reference known settings, defaults match their kind. Visibility
    /// cycles are deliberately not detected.
    pub fn resolve(self) -> Result<ResolvedSchema, SchemaError> {
        let mut index = HashMap::new();
        for (page_idx, page) in self.pages.iter().enumerate() {
            for (section_idx, section) in page.sections.iter().enumerate() {
                for (setting_idx, def) in section.settings.iter().enumerate() {
                    if index
                        .insert(
                            def.key.clone(),
                            SettingPath {
                                page: page_idx,
                                section: section_idx,
                                setting: setting_idx,
                            },
                        )
                        .is_some()
                    {
                        return Err(SchemaError::DuplicateKey(def.key.clone()));
                    }

                    let mut item_keys = HashSet::new();
                    for item in &def.items {
                        if !item_keys.insert(item.key.as_str()) {
                            return Err(SchemaError::DuplicateItemKey {
                                setting: def.key.clone(),
                                item: item.key.clone(),
                            });
                        }
                    }

                    if let Some(default) = &def.default {
                        if !def.kind.accepts(default) {
                            return Err(SchemaError::DefaultTypeMismatch {
                                key: def.key.clone(),
                                kind: def.kind,
                            });
                        }
                    }
                }
            }
        }

        let mut page_keys = HashSet::new();
        for page in &self.pages {
            if !page_keys.insert(page.key.as_str()) {
                return Err(SchemaError::DuplicatePageKey(page.key.clone()));
            }
        }

        for def in self.settings() {
            if let Some(cond) = &def.visible_if {
                for referenced in cond.referenced_settings() {
                    if !index.contains_key(referenced) {
                        return Err(SchemaError::UnknownVisibilityRef {
                            setting: def.key.clone(),
                            referenced: referenced.to_string(),
                        });
                    }
                }
            }
        }

        Ok(ResolvedSchema {
            schema: self,
            index,
        })
    }

    /// All setting definitions in document order.
    pub fn settings(&self) -> impl Iterator<Item = &SettingDef> {
        self.pages
            .iter()
            .flat_map(|page| page.sections.iter())
            .flat_map(|section| section.settings.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SettingPath {
    page: usize,
    section: usize,
    setting: usize,
}

/// A schema whose tree invariants have been checked.
///
/// Existence of this value proves every setting key is unique and every
/// visibility reference points at a real setting.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    schema: Schema,
    index: HashMap<String, SettingPath>,
}

impl ResolvedSchema {
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&SettingDef> {
        let path = self.index.get(key)?;
        Some(&self.schema.pages[path.page].sections[path.section].settings[path.setting])
    }

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.schema.pages
    }

    #[must_use]
    pub fn page(&self, key: &str) -> Option<&Page> {
        self.schema.pages.iter().find(|page| page.key == key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn settings(&self) -> impl Iterator<Item = &SettingDef> {
        self.schema.settings()
    }
}
