//! Action invocation through the app: button focus, handler routing and
//! per-identity busy tracking.

use std::sync::{Arc, Mutex};

use dial_engine::ActionHandler;
use dial_engine::focus::{FocusTier, NavKey};
use dial_tui::App;
use dial_types::ValueMap;
use futures_util::future::BoxFuture;
use tokio::sync::Notify;

use crate::common;

fn recording_handler(seen: &Arc<Mutex<Vec<String>>>) -> ActionHandler {
    let seen = seen.clone();
    Arc::new(move |id: &str| {
        seen.lock().unwrap().push(id.to_string());
        let done: BoxFuture<'static, anyhow::Result<()>> = Box::pin(async { Ok(()) });
        done
    })
}

/// Navigate to the Advanced page and focus the first export button.
fn focus_export_button(app: &mut App) {
    app.on_key(common::key(NavKey::Down)); // sidebar: select Advanced
    app.on_key(common::key(NavKey::Enter)); // into the content list
    app.on_key(common::key(NavKey::Enter)); // drill into the button row
    assert_eq!(app.focus(), FocusTier::Control { item: 0, control: 0 });
}

#[tokio::test]
async fn button_activation_routes_the_item_scoped_id() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut app = App::new(common::demo_schema(), ValueMap::new())
        .with_action_handler(recording_handler(&seen));

    focus_export_button(&mut app);
    app.on_key(common::key(NavKey::Enter));

    let invocations = app.take_invocations();
    assert_eq!(invocations.len(), 1);
    for invocation in invocations {
        assert!(invocation.await);
    }
    assert_eq!(*seen.lock().unwrap(), ["export/csv"]);
    assert!(!app.engine().actions().is_loading("export/csv"));
}

#[tokio::test]
async fn sibling_buttons_have_distinct_identities() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut app = App::new(common::demo_schema(), ValueMap::new())
        .with_action_handler(recording_handler(&seen));

    focus_export_button(&mut app);
    app.on_key(common::key(NavKey::Right));
    assert_eq!(app.focus(), FocusTier::Control { item: 0, control: 1 });
    app.on_key(common::key(NavKey::Enter));

    for invocation in app.take_invocations() {
        assert!(invocation.await);
    }
    assert_eq!(*seen.lock().unwrap(), ["export/json"]);
}

#[tokio::test]
async fn single_button_actions_use_the_setting_key() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut app = App::new(common::demo_schema(), ValueMap::new())
        .with_action_handler(recording_handler(&seen));

    app.on_key(common::key(NavKey::Down));
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::key(NavKey::Down)); // reset card
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::key(NavKey::Enter));

    for invocation in app.take_invocations() {
        assert!(invocation.await);
    }
    assert_eq!(*seen.lock().unwrap(), ["reset"]);
}

#[tokio::test]
async fn second_press_while_busy_is_dropped() {
    let gate = Arc::new(Notify::new());
    let release = gate.clone();
    let handler: ActionHandler = Arc::new(move |_id: &str| {
        let gate = gate.clone();
        let work: BoxFuture<'static, anyhow::Result<()>> = Box::pin(async move {
            gate.notified().await;
            Ok(())
        });
        work
    });
    let mut app =
        App::new(common::demo_schema(), ValueMap::new()).with_action_handler(handler);

    focus_export_button(&mut app);
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::key(NavKey::Enter)); // double press

    let mut invocations = app.take_invocations().into_iter();
    let first = tokio::spawn(invocations.next().unwrap());
    let second = invocations.next().unwrap();

    let arena = app.engine().actions().clone();
    while !arena.is_loading("export/csv") {
        tokio::task::yield_now().await;
    }

    // The duplicate sees the busy flag and is ignored, never queued.
    assert!(!second.await);
    assert!(arena.is_loading("export/csv"));

    release.notify_one();
    assert!(first.await.unwrap());
    assert!(!arena.is_loading("export/csv"));
}

#[tokio::test]
async fn failing_handler_clears_the_busy_flag() {
    let handler: ActionHandler = Arc::new(|_id: &str| {
        let work: BoxFuture<'static, anyhow::Result<()>> =
            Box::pin(async { Err(anyhow::anyhow!("backend unreachable")) });
        work
    });
    let mut app =
        App::new(common::demo_schema(), ValueMap::new()).with_action_handler(handler);

    focus_export_button(&mut app);
    app.on_key(common::key(NavKey::Enter));

    for invocation in app.take_invocations() {
        // The failure is logged inside the arena, not surfaced here.
        assert!(invocation.await);
    }
    assert!(!app.engine().actions().is_loading("export/csv"));
}
