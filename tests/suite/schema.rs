//! Schema resolution and TOML loading.

use std::fs;

use dial_types::{Schema, SchemaError, SettingValue, ValueMap};

use crate::common;

#[test]
fn schema_round_trips_through_a_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.toml");
    fs::write(
        &path,
        r#"
            [[pages]]
            key = "general"
            title = "General"

            [[pages.sections]]
            key = "editor"
            title = "Editor"

            [[pages.sections.settings]]
            key = "autoSave"
            label = "Auto save"
            kind = "bool"
            default = true

            [[pages.sections.settings]]
            key = "username"
            label = "Username"
            kind = "text"
            rules = { required = true, min_length = 3 }

            [[pages.sections.settings]]
            key = "dependent"
            label = "Dependent"
            kind = "text"
            visible_if = { setting = "autoSave", equals = true }
        "#,
    )
    .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let schema: Schema = toml::from_str(&text).unwrap();
    let resolved = schema.resolve().unwrap();

    assert!(resolved.contains("username"));
    assert_eq!(
        resolved.setting("autoSave").unwrap().default,
        Some(SettingValue::Bool(true))
    );
    assert!(resolved.setting("username").unwrap().rules.as_ref().unwrap().required);
}

#[test]
fn duplicate_keys_across_pages_are_rejected() {
    let schema: Schema = serde_json::from_value(serde_json::json!({
        "pages": [
            {
                "key": "a", "title": "A",
                "sections": [{ "key": "s", "title": "S", "settings": [
                    { "key": "shared", "label": "Shared", "kind": "bool" }
                ]}]
            },
            {
                "key": "b", "title": "B",
                "sections": [{ "key": "s", "title": "S", "settings": [
                    { "key": "shared", "label": "Shared again", "kind": "text" }
                ]}]
            }
        ]
    }))
    .unwrap();
    assert_eq!(
        schema.resolve().unwrap_err(),
        SchemaError::DuplicateKey("shared".to_string())
    );
}

#[test]
fn visibility_must_reference_known_settings() {
    let schema: Schema = serde_json::from_value(serde_json::json!({
        "pages": [{
            "key": "a", "title": "A",
            "sections": [{ "key": "s", "title": "S", "settings": [
                {
                    "key": "dependent", "label": "Dependent", "kind": "text",
                    "visible_if": { "setting": "ghost" }
                }
            ]}]
        }]
    }))
    .unwrap();
    assert!(matches!(
        schema.resolve().unwrap_err(),
        SchemaError::UnknownVisibilityRef { referenced, .. } if referenced == "ghost"
    ));
}

#[test]
fn multi_operator_predicates_fail_at_parse_time() {
    let result: Result<Schema, _> = toml::from_str(
        r#"
            [[pages]]
            key = "a"
            title = "A"

            [[pages.sections]]
            key = "s"
            title = "S"

            [[pages.sections.settings]]
            key = "dependent"
            label = "Dependent"
            kind = "text"
            visible_if = { setting = "mode", equals = "x", contains = "y" }
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn the_shared_fixture_resolves() {
    let schema = common::demo_schema();
    assert_eq!(schema.pages().len(), 2);
    assert!(schema.contains("alias"));
    assert!(schema.setting("export").unwrap().items.len() == 2);
}

#[test]
fn value_maps_round_trip_through_toml() {
    let mut values = ValueMap::new();
    values.insert("autoSave", SettingValue::Bool(false));
    values.insert("maxConnections", SettingValue::Number(16.0));
    values.insert("username", SettingValue::Text("sam".to_string()));
    values.insert(
        "channels",
        SettingValue::List(vec!["email".to_string(), "push".to_string()]),
    );

    let text = toml::to_string_pretty(&values).unwrap();
    let parsed: ValueMap = toml::from_str(&text).unwrap();
    assert_eq!(parsed, values);
}
