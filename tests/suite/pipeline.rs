//! Mutation pipeline tests: validate, then confirm, then apply.

use std::sync::{Arc, Mutex};

use dial_engine::Engine;
use dial_engine::focus::NavKey;
use dial_tui::App;
use dial_types::{SettingValue, ValueMap};

use crate::common;

type Emissions = Arc<Mutex<Vec<(String, SettingValue)>>>;

fn engine() -> (Engine, Emissions) {
    let emissions: Emissions = Arc::new(Mutex::new(Vec::new()));
    let sink = emissions.clone();
    let engine = Engine::new(
        common::demo_schema(),
        Box::new(move |key, value| {
            sink.lock().unwrap().push((key.to_string(), value.clone()));
        }),
    );
    (engine, emissions)
}

fn emitted(emissions: &Emissions) -> Vec<(String, SettingValue)> {
    emissions.lock().unwrap().clone()
}

#[test]
fn correction_sequence_replaces_the_error_then_clears_it() {
    let (mut engine, emissions) = engine();

    engine
        .set_value("username", SettingValue::Text(String::new()))
        .unwrap();
    assert_eq!(engine.error("username"), Some("This field is required"));

    engine
        .set_value("username", SettingValue::Text("ab".to_string()))
        .unwrap();
    assert_eq!(
        engine.error("username"),
        Some("Must be at least 3 characters")
    );
    assert!(emitted(&emissions).is_empty());

    engine
        .set_value("username", SettingValue::Text("sam".to_string()))
        .unwrap();
    assert!(engine.error("username").is_none());
    assert_eq!(
        emitted(&emissions),
        vec![("username".to_string(), SettingValue::Text("sam".to_string()))]
    );
}

#[test]
fn accepted_confirmation_applies_even_a_failing_candidate() {
    let (mut engine, emissions) = engine();

    // "ab" fails min_length, but alias is confirm-gated: the error is
    // recorded and the candidate still goes to the broker.
    engine
        .set_value("alias", SettingValue::Text("ab".to_string()))
        .unwrap();
    assert_eq!(engine.error("alias"), Some("Must be at least 3 characters"));
    assert!(engine.pending_confirm().is_some());
    assert!(emitted(&emissions).is_empty());

    // Accepting applies the candidate as-is; the recorded error stands.
    engine.resolve_confirm(true);
    assert_eq!(
        emitted(&emissions),
        vec![("alias".to_string(), SettingValue::Text("ab".to_string()))]
    );
    assert_eq!(engine.error("alias"), Some("Must be at least 3 characters"));
}

#[test]
fn later_gated_set_silently_replaces_the_earlier_one() {
    let (mut engine, emissions) = engine();

    engine
        .set_value("telemetry", SettingValue::Bool(true))
        .unwrap();
    engine
        .set_value("alias", SettingValue::Text("neo".to_string()))
        .unwrap();

    // Only one slot: the telemetry candidate is gone.
    assert_eq!(engine.pending_confirm().unwrap().key, "alias");
    engine.resolve_confirm(true);
    assert_eq!(
        emitted(&emissions),
        vec![("alias".to_string(), SettingValue::Text("neo".to_string()))]
    );
}

#[tokio::test]
async fn async_validator_runs_only_after_sync_rules_pass() {
    let calls = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = calls.clone();
    let (engine, _) = engine();
    let mut engine = engine.with_async_validator(Box::new(move |key, value| {
        seen.lock().unwrap().push(key.to_string());
        let taken = matches!(value, Some(SettingValue::Text(text)) if text == "taken");
        Box::pin(async move { taken.then(|| "Name already taken".to_string()) })
    }));

    // Required + empty: sync fails, async validator never consulted.
    let values = ValueMap::new();
    engine.validate(&values, "username").await.unwrap();
    assert_eq!(engine.error("username"), Some("This field is required"));
    assert!(calls.lock().unwrap().is_empty());

    let mut values = ValueMap::new();
    values.insert("username", SettingValue::Text("taken".to_string()));
    engine.validate(&values, "username").await.unwrap();
    assert_eq!(engine.error("username"), Some("Name already taken"));

    values.insert("username", SettingValue::Text("sam".to_string()));
    engine.validate(&values, "username").await.unwrap();
    assert!(engine.error("username").is_none());
    assert_eq!(*calls.lock().unwrap(), ["username", "username"]);
}

/// Keyboard script: drill into the telemetry toggle, flip it, and answer
/// the confirmation modal.
fn app_at_telemetry_toggle() -> App {
    let mut app = App::new(common::demo_schema(), ValueMap::new());
    app.on_key(common::key(NavKey::Enter)); // sidebar -> first item
    app.on_key(common::ctrl(NavKey::Down)); // jump to the Privacy section
    app.on_key(common::key(NavKey::Enter)); // drill into the toggle
    app.on_key(common::key(NavKey::Char(' '))); // flip it
    app
}

#[test]
fn modal_accept_applies_the_toggle() {
    let mut app = app_at_telemetry_toggle();
    assert_eq!(app.engine().pending_confirm().unwrap().key, "telemetry");
    assert_eq!(app.values().get("telemetry"), None);

    app.on_key(common::key(NavKey::Char('y')));
    assert!(app.engine().pending_confirm().is_none());
    assert_eq!(
        app.values().get("telemetry"),
        Some(&SettingValue::Bool(true))
    );
}

#[test]
fn modal_reject_discards_the_candidate() {
    let mut app = app_at_telemetry_toggle();
    app.on_key(common::key(NavKey::Escape));
    assert!(app.engine().pending_confirm().is_none());
    assert_eq!(app.values().get("telemetry"), None);
}

#[test]
fn default_backed_dependency_is_visible_from_the_start() {
    let (engine, _) = engine();
    // Nothing written yet: autoSave's default of true drives visibility.
    assert!(engine.is_visible(&ValueMap::new(), "autoSaveDelay").unwrap());

    let mut values = ValueMap::new();
    values.insert("autoSave", SettingValue::Bool(false));
    assert!(!engine.is_visible(&values, "autoSaveDelay").unwrap());
}

#[test]
fn toggling_the_dependency_hides_the_dependent_setting() {
    let mut app = App::new(common::demo_schema(), ValueMap::new());
    let before = app.nav_model().items.len();

    app.on_key(common::key(NavKey::Enter)); // sidebar -> autoSave item
    app.on_key(common::key(NavKey::Enter)); // drill into the toggle
    app.on_key(common::key(NavKey::Char(' '))); // autoSave -> false

    assert_eq!(
        app.values().get("autoSave"),
        Some(&SettingValue::Bool(false))
    );
    assert_eq!(app.nav_model().items.len(), before - 1);
    assert!(
        !app.nav_model()
            .items
            .iter()
            .any(|item| item.key == "autoSaveDelay")
    );
}

#[test]
fn readonly_setting_ignores_the_whole_pipeline() {
    let (mut engine, emissions) = engine();
    engine
        .set_value("installId", SettingValue::Text("hacked".to_string()))
        .unwrap();
    assert!(emitted(&emissions).is_empty());
    assert!(engine.error("installId").is_none());
    assert!(engine.pending_confirm().is_none());
}
