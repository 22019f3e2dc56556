//! Translation from crossterm events to the engine's key model.
//!
//! The engine is deliberately free of terminal crates; this is the only
//! place where crossterm key codes meet [`KeyInput`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use dial_engine::focus::{KeyInput, NavKey};

use crate::app::App;

/// Map one crossterm key event to the engine's key model.
#[must_use]
pub fn translate(event: &KeyEvent) -> Option<KeyInput> {
    if !matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    let key = match event.code {
        KeyCode::Up => NavKey::Up,
        KeyCode::Down => NavKey::Down,
        KeyCode::Left => NavKey::Left,
        KeyCode::Right => NavKey::Right,
        KeyCode::Home => NavKey::Home,
        KeyCode::End => NavKey::End,
        KeyCode::Enter => NavKey::Enter,
        KeyCode::Esc => NavKey::Escape,
        KeyCode::Backspace => NavKey::Backspace,
        KeyCode::Delete => NavKey::Delete,
        KeyCode::F(6) => NavKey::PaneCycle,
        KeyCode::Char(ch) => NavKey::Char(ch),
        _ => return None,
    };
    Some(KeyInput {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        meta: event.modifiers.contains(KeyModifiers::META)
            || event.modifiers.contains(KeyModifiers::SUPER),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    })
}

/// Feed one terminal event into the application.
pub fn handle_event(app: &mut App, event: &Event) {
    if let Event::Key(key_event) = event {
        if let Some(input) = translate(key_event) {
            app.on_key(input);
        }
    }
}
