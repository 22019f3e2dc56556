//! Sidebar pane: the page list.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use dial_engine::focus::{FocusTier, PaneId};

use crate::app::App;
use crate::theme::Palette;

pub(crate) fn draw(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let focused = matches!(app.focus(), FocusTier::Pane(PaneId::Sidebar));
    let border_style = if focused {
        Style::default().fg(palette.primary)
    } else {
        Style::default().fg(palette.text_muted)
    };

    let mut lines: Vec<Line> = Vec::new();
    for (index, page) in app.engine().schema().pages().iter().enumerate() {
        let selected = index == app.selected_page();
        let pointer = if selected { ">" } else { " " };
        let style = if selected {
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{pointer} "), Style::default().fg(palette.accent)),
            Span::styled(page.title.clone(), style),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(" Pages ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
