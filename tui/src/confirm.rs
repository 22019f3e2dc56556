//! Centered confirmation modal for a pending gated mutation.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
};

use crate::app::{App, display_text};
use crate::theme::{Palette, styles};

pub(crate) fn draw(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(pending) = app.engine().pending_confirm() else {
        return;
    };

    let confirm_label = pending.config.confirm_label.as_deref().unwrap_or("confirm");
    let cancel_label = pending.config.cancel_label.as_deref().unwrap_or("cancel");

    let lines: Vec<Line> = vec![
        Line::from(Span::styled(" Confirmation required ", styles::title(palette))),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", pending.config.message),
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(vec![
            Span::styled(" New value: ", styles::muted(palette)),
            Span::styled(
                display_text(&pending.candidate),
                Style::default()
                    .fg(palette.warning)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter/y", styles::key_highlight(palette)),
            Span::styled(format!(" {confirm_label}  "), styles::key_hint(palette)),
            Span::styled("Esc/n", styles::key_highlight(palette)),
            Span::styled(format!(" {cancel_label}"), styles::key_hint(palette)),
        ]),
    ];

    let content_width = lines
        .iter()
        .map(ratatui::prelude::Line::width)
        .max()
        .unwrap_or(10) as u16;
    let content_width = content_width.min(frame.area().width.saturating_sub(4));
    let content_height = lines.len() as u16;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_popup))
        .padding(Padding::uniform(1));

    let height = content_height.saturating_add(4);
    let width = content_width.saturating_add(4);
    let area = frame.area();
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    };

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
