//! Content pane: setting cards for the selected page.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use dial_engine::focus::{FocusTier, PaneId};
use dial_types::{SettingDef, SettingKind, SettingValue};

use crate::app::{App, display_text};
use crate::theme::{Palette, styles};

pub(crate) fn draw(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let focused_pane = matches!(
        app.focus(),
        FocusTier::Pane(PaneId::Content) | FocusTier::Item { .. } | FocusTier::Control { .. }
    );
    let border_style = if focused_pane {
        Style::default().fg(palette.primary)
    } else {
        Style::default().fg(palette.text_muted)
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0_usize;

    if app.search_active() || !app.search().is_empty() {
        let cursor = if app.search_active() { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled("Search: ", styles::muted(palette)),
            Span::styled(
                format!("{}{cursor}", app.search()),
                Style::default().fg(palette.text_primary),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let settings = app.visible_settings();
    let sections = app.section_titles();
    let mut last_section: Option<usize> = None;
    let model = app.nav_model();

    for (index, def) in settings.iter().enumerate() {
        let section = model.items.get(index).map_or(0, |item| item.section);
        if last_section != Some(section) {
            if last_section.is_some() {
                lines.push(Line::from(""));
            }
            let title = sections.get(section).copied().unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("— {title} —"),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            last_section = Some(section);
        }

        let item_focused = matches!(app.focus(), FocusTier::Item { index: i } if i == index);
        if item_focused || control_focus(app, index).is_some() {
            focused_line = lines.len();
        }
        draw_card(app, def, index, item_focused, palette, &mut lines);
    }

    if settings.is_empty() {
        lines.push(Line::from(Span::styled(
            "No settings match.",
            styles::muted(palette),
        )));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(focused_line, lines.len(), inner_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(" Settings ");
    frame.render_widget(
        Paragraph::new(lines).block(block).scroll((offset as u16, 0)),
        area,
    );
}

/// Keep the focused line in view without wobbling at the edges.
fn scroll_offset(focused_line: usize, total: usize, viewport: usize) -> usize {
    if viewport == 0 || total <= viewport {
        return 0;
    }
    let max_offset = total - viewport;
    focused_line.saturating_sub(viewport / 2).min(max_offset)
}

fn control_focus(app: &App, item: usize) -> Option<usize> {
    match app.focus() {
        FocusTier::Control { item: i, control } if i == item => Some(control),
        _ => None,
    }
}

fn draw_card(
    app: &App,
    def: &SettingDef,
    index: usize,
    item_focused: bool,
    palette: &Palette,
    lines: &mut Vec<Line<'static>>,
) {
    let pointer = if item_focused { ">" } else { " " };
    let label_style = if def.dangerous {
        Style::default()
            .fg(palette.error)
            .add_modifier(Modifier::BOLD)
    } else if item_focused {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.text_primary)
    };

    let mut head = vec![
        Span::styled(
            format!("{pointer} "),
            Style::default().fg(palette.accent),
        ),
        Span::styled(def.label.clone(), label_style),
    ];
    if def.readonly {
        head.push(Span::styled("  (readonly)", styles::muted(palette)));
    }
    if def.disabled {
        head.push(Span::styled("  (disabled)", styles::muted(palette)));
    }
    head.extend(value_spans(app, def, index, palette));
    lines.push(Line::from(head));

    if let Some(description) = &def.description {
        lines.push(Line::from(Span::styled(
            format!("    {description}"),
            styles::muted(palette),
        )));
    }

    match def.kind {
        SettingKind::MultiSelect => draw_checkboxes(app, def, index, palette, lines),
        SettingKind::Action => draw_buttons(app, def, index, palette, lines),
        _ => {}
    }

    if let Some(error) = app.error_for(&def.key) {
        lines.push(Line::from(Span::styled(
            format!("    {error}"),
            styles::error(palette),
        )));
    }
}

fn value_spans(
    app: &App,
    def: &SettingDef,
    index: usize,
    palette: &Palette,
) -> Vec<Span<'static>> {
    // Checkbox groups and action buttons render their own control lines.
    if matches!(def.kind, SettingKind::MultiSelect | SettingKind::Action) {
        return Vec::new();
    }

    let editing = app
        .draft()
        .filter(|draft| draft.key == def.key)
        .filter(|_| control_focus(app, index).is_some());
    if let Some(draft) = editing {
        let before: String = draft.text.chars().take(draft.cursor).collect();
        let after: String = draft.text.chars().skip(draft.cursor).collect();
        return vec![
            Span::raw("  "),
            Span::styled(before, Style::default().fg(palette.warning)),
            Span::styled("▏", Style::default().fg(palette.accent)),
            Span::styled(after, Style::default().fg(palette.warning)),
        ];
    }

    let text = app
        .engine()
        .value(app.values(), &def.key)
        .ok()
        .flatten()
        .map_or_else(|| "—".to_string(), display_text);
    let style = if def.disabled || def.readonly {
        Style::default().fg(palette.text_disabled)
    } else if control_focus(app, index).is_some() {
        Style::default()
            .fg(palette.warning)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.text_secondary)
    };
    vec![Span::raw("  "), Span::styled(text, style)]
}

fn draw_checkboxes(
    app: &App,
    def: &SettingDef,
    index: usize,
    palette: &Palette,
    lines: &mut Vec<Line<'static>>,
) {
    let selected: Vec<String> = app
        .engine()
        .value(app.values(), &def.key)
        .ok()
        .flatten()
        .and_then(SettingValue::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default();
    let focus = control_focus(app, index);

    for (control, option) in def.options.iter().enumerate() {
        if option.hidden {
            continue;
        }
        let checked = selected.iter().any(|entry| *entry == option.value);
        let checkbox = if checked { "[x]" } else { "[ ]" };
        let pointer = if focus == Some(control) { ">" } else { " " };
        let style = if focus == Some(control) {
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("   {pointer} "), Style::default().fg(palette.accent)),
            Span::styled(format!("{checkbox} {}", option.label), style),
        ]));
    }
}

fn draw_buttons(
    app: &App,
    def: &SettingDef,
    index: usize,
    palette: &Palette,
    lines: &mut Vec<Line<'static>>,
) {
    let focus = control_focus(app, index);
    let arena = app.engine().actions();
    let mut spans: Vec<Span> = vec![Span::raw("    ")];

    let buttons: Vec<(String, String, bool)> = if def.items.is_empty() {
        vec![(def.key.clone(), def.label.clone(), def.dangerous)]
    } else {
        def.items
            .iter()
            .map(|item| {
                (
                    format!("{}/{}", def.key, item.key),
                    item.label.clone(),
                    item.dangerous,
                )
            })
            .collect()
    };

    for (control, (id, label, dangerous)) in buttons.iter().enumerate() {
        let loading = arena.is_loading(id);
        let focused = focus == Some(control);
        let mut style = if *dangerous {
            Style::default().fg(palette.error)
        } else {
            Style::default().fg(palette.accent)
        };
        if focused {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let text = if loading {
            format!("[ {label} … ]")
        } else {
            format!("[ {label} ]")
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw("  "));
    }
    lines.push(Line::from(spans));
}
