//! Keyboard-driven focus navigation across the whole app.

use dial_engine::focus::{FocusTier, NavKey, PaneId};
use dial_tui::App;
use dial_types::{SettingValue, ValueMap};

use crate::common;

fn app() -> App {
    App::new(common::demo_schema(), ValueMap::new())
}

#[test]
fn sidebar_enter_moves_into_the_content_list() {
    let mut app = app();
    assert_eq!(app.focus(), FocusTier::Pane(PaneId::Sidebar));

    app.on_key(common::key(NavKey::Enter));
    assert_eq!(app.focus(), FocusTier::Item { index: 0 });
}

#[test]
fn item_arrows_clamp_and_home_end_jump() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));
    let last = app.nav_model().items.len() - 1;

    app.on_key(common::key(NavKey::Up)); // already at the top
    assert_eq!(app.focus(), FocusTier::Item { index: 0 });

    app.on_key(common::key(NavKey::End));
    assert_eq!(app.focus(), FocusTier::Item { index: last });

    app.on_key(common::key(NavKey::Down)); // already at the bottom
    assert_eq!(app.focus(), FocusTier::Item { index: last });

    app.on_key(common::key(NavKey::Home));
    assert_eq!(app.focus(), FocusTier::Item { index: 0 });
}

#[test]
fn drill_in_commit_and_escape_walk_back_out() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::key(NavKey::Down));
    app.on_key(common::key(NavKey::Down)); // username
    app.on_key(common::key(NavKey::Enter));
    assert_eq!(app.focus(), FocusTier::Control { item: 2, control: 0 });
    assert_eq!(app.draft().unwrap().key, "username");

    for ch in "sam".chars() {
        app.on_key(common::key(NavKey::Char(ch)));
    }
    app.on_key(common::key(NavKey::Enter));
    assert_eq!(
        app.values().get("username"),
        Some(&SettingValue::Text("sam".to_string()))
    );

    app.on_key(common::key(NavKey::Escape)); // leave the text control
    assert_eq!(app.focus(), FocusTier::Item { index: 2 });
    assert!(app.draft().is_none());

    app.on_key(common::key(NavKey::Escape)); // back to the sidebar
    assert_eq!(app.focus(), FocusTier::Pane(PaneId::Sidebar));
}

#[test]
fn section_jump_wraps_around() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));

    app.on_key(common::ctrl(NavKey::Down));
    assert_eq!(app.focus(), FocusTier::Item { index: 4 }); // first Privacy item

    app.on_key(common::ctrl(NavKey::Down)); // past the last section, wraps
    assert_eq!(app.focus(), FocusTier::Item { index: 0 });

    app.on_key(common::ctrl(NavKey::Up)); // wraps backwards too
    assert_eq!(app.focus(), FocusTier::Item { index: 4 });
}

#[test]
fn section_jump_works_while_editing_text() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::key(NavKey::Down));
    app.on_key(common::key(NavKey::Down)); // username
    app.on_key(common::key(NavKey::Enter));
    assert!(app.draft().is_some());

    // Plain arrows stay inside the edit.
    app.on_key(common::key(NavKey::Down));
    assert_eq!(app.focus(), FocusTier::Control { item: 2, control: 0 });

    // The modified arrow escapes it.
    app.on_key(common::ctrl(NavKey::Down));
    assert_eq!(app.focus(), FocusTier::Item { index: 4 });
    assert!(app.draft().is_none());
}

#[test]
fn pane_cycle_restores_the_remembered_content_position() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::key(NavKey::Down));
    app.on_key(common::key(NavKey::Down));
    app.on_key(common::key(NavKey::Down)); // theme, index 3

    app.on_key(common::key(NavKey::PaneCycle));
    assert_eq!(app.focus(), FocusTier::Pane(PaneId::Sidebar));

    app.on_key(common::key(NavKey::PaneCycle));
    assert_eq!(app.focus(), FocusTier::Item { index: 3 });
}

#[test]
fn focus_search_filters_and_lands_on_the_first_match() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));

    app.on_key(common::key(NavKey::Char('/')));
    assert!(app.search_active());
    for ch in "theme".chars() {
        app.on_key(common::key(NavKey::Char(ch)));
    }
    assert_eq!(app.nav_model().items.len(), 1);
    assert_eq!(app.nav_model().items[0].key, "theme");

    app.on_key(common::key(NavKey::Enter));
    assert!(!app.search_active());
    assert_eq!(app.focus(), FocusTier::Item { index: 0 });
}

#[test]
fn escape_clears_search_text_before_leaving_search() {
    let mut app = app();
    app.on_key(common::key(NavKey::Char('/')));
    app.on_key(common::key(NavKey::Char('x')));

    app.on_key(common::key(NavKey::Escape));
    assert!(app.search().is_empty());
    assert!(app.search_active()); // still searching, just emptied

    app.on_key(common::key(NavKey::Escape));
    assert!(!app.search_active());
}

#[test]
fn pane_cycle_out_of_search_deactivates_it() {
    let mut app = app();
    app.on_key(common::key(NavKey::Char('/')));
    for ch in "theme".chars() {
        app.on_key(common::key(NavKey::Char(ch)));
    }
    assert!(app.search_active());

    // F6 jumps straight into the content list; the search line must not
    // keep eating keystrokes once an item shows focused.
    app.on_key(common::key(NavKey::PaneCycle));
    assert_eq!(app.focus(), FocusTier::Item { index: 0 });
    assert!(!app.search_active());

    app.on_key(common::key(NavKey::Char('z')));
    assert_eq!(app.search(), "theme");
}

#[test]
fn slash_inside_a_text_edit_is_just_a_character() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::key(NavKey::Down));
    app.on_key(common::key(NavKey::Down)); // username
    app.on_key(common::key(NavKey::Enter));

    app.on_key(common::key(NavKey::Char('/')));
    assert!(!app.search_active());
    assert_eq!(app.draft().unwrap().text, "/");
}

#[test]
fn checkbox_arrows_skip_hidden_options_without_wrapping() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::ctrl(NavKey::Down)); // Privacy section, telemetry
    app.on_key(common::key(NavKey::Down));
    app.on_key(common::key(NavKey::Down)); // channels, index 6
    app.on_key(common::key(NavKey::Enter));
    assert_eq!(app.focus(), FocusTier::Control { item: 6, control: 0 });

    app.on_key(common::key(NavKey::Down)); // push
    assert_eq!(app.focus(), FocusTier::Control { item: 6, control: 1 });

    app.on_key(common::key(NavKey::Down)); // skips hidden sms, lands on digest
    assert_eq!(app.focus(), FocusTier::Control { item: 6, control: 3 });

    app.on_key(common::key(NavKey::Down)); // clamped
    assert_eq!(app.focus(), FocusTier::Control { item: 6, control: 3 });

    // Space checks the focused checkbox.
    app.on_key(common::key(NavKey::Char(' ')));
    assert_eq!(
        app.values().get("channels"),
        Some(&SettingValue::List(vec!["digest".to_string()]))
    );
}

#[test]
fn drill_in_returns_to_the_remembered_control() {
    let mut app = app();
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::ctrl(NavKey::Down));
    app.on_key(common::key(NavKey::Down));
    app.on_key(common::key(NavKey::Down)); // channels
    app.on_key(common::key(NavKey::Enter));
    app.on_key(common::key(NavKey::Down)); // second checkbox

    app.on_key(common::key(NavKey::Escape)); // drill out remembers control 1
    app.on_key(common::key(NavKey::Enter));
    assert_eq!(app.focus(), FocusTier::Control { item: 6, control: 1 });
}
