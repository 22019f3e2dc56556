//! Focus transition rules.

use std::collections::HashMap;

use super::{
    ControlKind, FocusTier, KeyInput, NavContext, NavKey, NavModel, NavOutcome, PaneId,
};

/// The focus navigation state machine.
///
/// Stateless with respect to the current focus position (that is derived by
/// the caller from the focused element); the only state held here is the
/// remembered last-drilled control per card and the remembered content
/// position used by the pane-cycle shortcut.
#[derive(Debug, Default)]
pub struct Navigator {
    last_control: HashMap<String, usize>,
    last_content_item: Option<usize>,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one translated key press through the transition rules.
    pub fn handle(
        &mut self,
        model: &NavModel,
        current: FocusTier,
        ctx: NavContext,
        input: KeyInput,
    ) -> NavOutcome {
        // Ctrl/Meta is reserved for the section-jump shortcut, which works
        // regardless of focus location, including inside free-text edits.
        if input.has_section_modifier() {
            return match input.key {
                NavKey::Up => self.section_jump(model, current, -1),
                NavKey::Down => self.section_jump(model, current, 1),
                _ => NavOutcome::NotHandled,
            };
        }

        if input.key == NavKey::PaneCycle {
            return self.cycle_pane(model, current, input.shift);
        }

        // Focus-search falls through to normal typing inside a text edit.
        if input.key == NavKey::Char('/') {
            if ctx.in_text_edit || ctx.in_search {
                return NavOutcome::NotHandled;
            }
            return NavOutcome::FocusSearch;
        }

        if ctx.in_search {
            if input.key == NavKey::Escape && ctx.search_has_text {
                return NavOutcome::ClearSearch;
            }
            return NavOutcome::NotHandled;
        }

        // Never contradict native text editing.
        if ctx.in_text_edit {
            return NavOutcome::NotHandled;
        }

        match current {
            FocusTier::None | FocusTier::Pane(PaneId::Sidebar) => NavOutcome::NotHandled,
            FocusTier::Pane(PaneId::Content) => self.on_content_pane(model, input),
            FocusTier::Item { index } => self.on_item(model, index, input),
            FocusTier::Control { item, control } => self.on_control(model, item, control, input),
        }
    }

    fn on_content_pane(&mut self, model: &NavModel, input: KeyInput) -> NavOutcome {
        match input.key {
            NavKey::Enter | NavKey::Down | NavKey::Home => self.focus_item(model, 0),
            NavKey::End => {
                if model.items.is_empty() {
                    NavOutcome::Handled
                } else {
                    self.focus_item(model, model.items.len() - 1)
                }
            }
            _ => NavOutcome::NotHandled,
        }
    }

    fn on_item(&mut self, model: &NavModel, index: usize, input: KeyInput) -> NavOutcome {
        let len = model.items.len();
        match input.key {
            // Boundary clamp, no wraparound.
            NavKey::Down => {
                if index + 1 < len {
                    self.focus_item(model, index + 1)
                } else {
                    NavOutcome::Handled
                }
            }
            NavKey::Up => {
                if index > 0 {
                    self.focus_item(model, index - 1)
                } else {
                    NavOutcome::Handled
                }
            }
            NavKey::Home => {
                if len == 0 {
                    NavOutcome::Handled
                } else {
                    self.focus_item(model, 0)
                }
            }
            NavKey::End => {
                if len == 0 {
                    NavOutcome::Handled
                } else {
                    self.focus_item(model, len - 1)
                }
            }
            NavKey::Enter => self.drill_in(model, index),
            NavKey::Escape => NavOutcome::Focus {
                tier: FocusTier::Pane(PaneId::Sidebar),
                scroll: false,
            },
            _ => NavOutcome::NotHandled,
        }
    }

    fn on_control(
        &mut self,
        model: &NavModel,
        item: usize,
        control: usize,
        input: KeyInput,
    ) -> NavOutcome {
        let Some(nav_item) = model.items.get(item) else {
            return NavOutcome::NotHandled;
        };
        match input.key {
            NavKey::Escape => {
                // Drill out, remembering where we were inside this card.
                self.last_control.insert(nav_item.key.clone(), control);
                self.last_content_item = Some(item);
                NavOutcome::Focus {
                    tier: FocusTier::Item { index: item },
                    scroll: false,
                }
            }
            NavKey::Down | NavKey::Up
                if matches!(
                    nav_item.controls.get(control).map(|c| c.kind),
                    Some(ControlKind::Checkbox { .. })
                ) =>
            {
                // Inside a checkbox group, arrows move between sibling
                // checkboxes only, skipping hidden ones, without wraparound.
                let step_down = input.key == NavKey::Down;
                let sibling = if step_down {
                    nav_item
                        .controls
                        .iter()
                        .enumerate()
                        .skip(control + 1)
                        .find(|(_, c)| visible_checkbox(c.kind))
                } else {
                    nav_item
                        .controls
                        .iter()
                        .enumerate()
                        .take(control)
                        .rev()
                        .find(|(_, c)| visible_checkbox(c.kind))
                };
                match sibling {
                    Some((next, _)) => NavOutcome::Focus {
                        tier: FocusTier::Control {
                            item,
                            control: next,
                        },
                        scroll: false,
                    },
                    None => NavOutcome::Handled,
                }
            }
            NavKey::Left | NavKey::Right
                if nav_item.controls.len() > 1
                    && !matches!(
                        nav_item.controls.get(control).map(|c| c.kind),
                        Some(ControlKind::Checkbox { .. } | ControlKind::TextEdit)
                    ) =>
            {
                // Multi-button cards: horizontal movement between eligible
                // siblings, clamped at the ends.
                let sibling = if input.key == NavKey::Right {
                    nav_item
                        .controls
                        .iter()
                        .enumerate()
                        .skip(control + 1)
                        .find(|(_, c)| c.eligible())
                } else {
                    nav_item
                        .controls
                        .iter()
                        .enumerate()
                        .take(control)
                        .rev()
                        .find(|(_, c)| c.eligible())
                };
                match sibling {
                    Some((next, _)) => NavOutcome::Focus {
                        tier: FocusTier::Control {
                            item,
                            control: next,
                        },
                        scroll: false,
                    },
                    None => NavOutcome::Handled,
                }
            }
            _ => NavOutcome::NotHandled,
        }
    }

    fn drill_in(&mut self, model: &NavModel, index: usize) -> NavOutcome {
        let Some(item) = model.items.get(index) else {
            return NavOutcome::NotHandled;
        };

        // Prefer the remembered position inside this card when it is still
        // eligible, otherwise the first eligible control. Disabled controls
        // and controls removed from the tab order are skipped.
        let remembered = self
            .last_control
            .get(&item.key)
            .copied()
            .filter(|&c| item.controls.get(c).is_some_and(super::NavControl::eligible));
        let target = remembered.or_else(|| item.controls.iter().position(super::NavControl::eligible));

        match target {
            Some(control) => {
                self.last_content_item = Some(index);
                NavOutcome::Focus {
                    tier: FocusTier::Control {
                        item: index,
                        control,
                    },
                    scroll: false,
                }
            }
            // No eligible control inside this card.
            None => NavOutcome::Handled,
        }
    }

    fn focus_item(&mut self, model: &NavModel, index: usize) -> NavOutcome {
        if index >= model.items.len() {
            return NavOutcome::Handled;
        }
        self.last_content_item = Some(index);
        NavOutcome::Focus {
            tier: FocusTier::Item { index },
            scroll: true,
        }
    }

    fn cycle_pane(&mut self, model: &NavModel, current: FocusTier, _reverse: bool) -> NavOutcome {
        // Two panes: forward and reverse traversal land on the same target,
        // the Shift variant differs only in announced direction.
        let in_content = matches!(
            current,
            FocusTier::Pane(PaneId::Content) | FocusTier::Item { .. } | FocusTier::Control { .. }
        );
        if in_content {
            if let FocusTier::Item { index } = current {
                self.last_content_item = Some(index);
            } else if let FocusTier::Control { item, .. } = current {
                self.last_content_item = Some(item);
            }
            return NavOutcome::Focus {
                tier: FocusTier::Pane(PaneId::Sidebar),
                scroll: false,
            };
        }

        // Entering the content pane restores the remembered first
        // interactive element instead of raw pane focus.
        let restore = self
            .last_content_item
            .filter(|&index| index < model.items.len())
            .or_else(|| (!model.items.is_empty()).then_some(0));
        match restore {
            Some(index) => self.focus_item(model, index),
            None => NavOutcome::Focus {
                tier: FocusTier::Pane(PaneId::Content),
                scroll: false,
            },
        }
    }

    fn section_jump(&self, model: &NavModel, current: FocusTier, step: isize) -> NavOutcome {
        if model.section_count == 0 {
            return NavOutcome::Handled;
        }
        let here = match current {
            FocusTier::Item { index } | FocusTier::Control { item: index, .. } => model
                .items
                .get(index)
                .map_or(0, |item| item.section),
            _ => self
                .last_content_item
                .and_then(|index| model.items.get(index))
                .map_or(0, |item| item.section),
        };
        let count = model.section_count as isize;
        // Wraparound in both directions.
        let section = (here as isize + step).rem_euclid(count) as usize;
        NavOutcome::SectionJump { section }
    }
}

fn visible_checkbox(kind: ControlKind) -> bool {
    matches!(kind, ControlKind::Checkbox { hidden: false })
}
