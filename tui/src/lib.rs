//! TUI rendering and input handling for Dial.

pub mod app;
mod confirm;
mod content;
pub mod input;
mod sidebar;
pub mod theme;

pub use app::{App, Draft};
pub use input::handle_event;
pub use theme::Palette;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

const SIDEBAR_WIDTH: u16 = 24;

/// Draw the whole screen: sidebar, content, and any pending modal on top.
pub fn draw(frame: &mut Frame, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(frame.area());

    sidebar::draw(frame, app, chunks[0], palette);
    content::draw(frame, app, chunks[1], palette);
    confirm::draw(frame, app, palette);
}
