//! Interactive application state.
//!
//! [`App`] owns the engine, the value map and the focus position, and turns
//! translated key input into engine calls. Rendering reads it immutably;
//! action invocations come back out as futures for the caller to spawn so
//! this crate stays runtime-agnostic.

use std::sync::mpsc;

use dial_engine::focus::{
    ControlKind, FocusTier, KeyInput, NavContext, NavControl, NavItem, NavKey, NavModel,
    NavOutcome, Navigator, PaneId,
};
use dial_engine::{ActionHandler, AsyncValidator, Engine, EngineError};
use dial_types::{ResolvedSchema, SettingDef, SettingKind, SettingValue, ValueMap};
use futures_util::future::BoxFuture;

const MSG_NOT_A_NUMBER: &str = "Must be a number";

/// An in-progress text edit for one setting.
#[derive(Debug, Clone)]
pub struct Draft {
    pub key: String,
    pub text: String,
    pub cursor: usize,
}

impl Draft {
    fn new(key: String, text: String) -> Self {
        let cursor = text.chars().count();
        Self { key, text, cursor }
    }

    fn insert(&mut self, ch: char) {
        let at = byte_offset(&self.text, self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = byte_offset(&self.text, self.cursor);
        self.text.remove(at);
    }

    fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = byte_offset(&self.text, self.cursor);
            self.text.remove(at);
        }
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}

pub struct App {
    engine: Engine,
    values: ValueMap,
    changes: mpsc::Receiver<(String, SettingValue)>,
    action_handler: Option<ActionHandler>,
    invocations: Vec<BoxFuture<'static, bool>>,
    navigator: Navigator,
    focus: FocusTier,
    selected_page: usize,
    search: String,
    search_active: bool,
    draft: Option<Draft>,
    /// Errors produced before the engine is involved (e.g. unparseable
    /// number input), keyed like validation errors.
    local_error: Option<(String, String)>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(schema: ResolvedSchema, values: ValueMap) -> Self {
        let (tx, rx) = mpsc::channel();
        let engine = Engine::new(
            schema,
            Box::new(move |key, value| {
                let _ = tx.send((key.to_string(), value.clone()));
            }),
        );
        Self {
            engine,
            values,
            changes: rx,
            action_handler: None,
            invocations: Vec::new(),
            navigator: Navigator::new(),
            focus: FocusTier::Pane(PaneId::Sidebar),
            selected_page: 0,
            search: String::new(),
            search_active: false,
            draft: None,
            local_error: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_action_handler(mut self, handler: ActionHandler) -> Self {
        self.action_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn with_async_validator(mut self, validator: AsyncValidator) -> Self {
        self.engine = self.engine.with_async_validator(validator);
        self
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    #[must_use]
    pub fn focus(&self) -> FocusTier {
        self.focus
    }

    #[must_use]
    pub fn selected_page(&self) -> usize {
        self.selected_page
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn search_active(&self) -> bool {
        self.search_active
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The error to show for `key`: engine validation error or local input
    /// error.
    #[must_use]
    pub fn error_for(&self, key: &str) -> Option<&str> {
        if let Some((k, message)) = &self.local_error {
            if k == key {
                return Some(message);
            }
        }
        self.engine.error(key)
    }

    /// Pull any action futures queued by `on_key` for the caller to spawn.
    pub fn take_invocations(&mut self) -> Vec<BoxFuture<'static, bool>> {
        std::mem::take(&mut self.invocations)
    }

    /// Apply queued change emissions to the owned value map.
    pub fn drain_changes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((key, value)) = self.changes.try_recv() {
            self.values.insert(key, value);
            applied += 1;
        }
        applied
    }

    /// Settings of the selected page that are visible and match the search.
    #[must_use]
    pub fn visible_settings(&self) -> Vec<&SettingDef> {
        let Some(page) = self.engine.schema().pages().get(self.selected_page) else {
            return Vec::new();
        };
        let needle = self.search.to_lowercase();
        page.sections
            .iter()
            .flat_map(|section| section.settings.iter())
            .filter(|def| {
                dial_engine::visibility::is_visible(
                    def.visible_if.as_ref(),
                    self.engine.schema(),
                    &self.values,
                )
            })
            .filter(|def| {
                needle.is_empty()
                    || def.label.to_lowercase().contains(&needle)
                    || def.key.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Section titles of the selected page, for headings and section jumps.
    #[must_use]
    pub fn section_titles(&self) -> Vec<&str> {
        self.engine
            .schema()
            .pages()
            .get(self.selected_page)
            .map(|page| {
                page.sections
                    .iter()
                    .map(|section| section.title.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Describe the rendered tree for the navigator.
    #[must_use]
    pub fn nav_model(&self) -> NavModel {
        let Some(page) = self.engine.schema().pages().get(self.selected_page) else {
            return NavModel::default();
        };
        let needle = self.search.to_lowercase();
        let mut items = Vec::new();
        for (section_idx, section) in page.sections.iter().enumerate() {
            for def in &section.settings {
                if !dial_engine::visibility::is_visible(
                    def.visible_if.as_ref(),
                    self.engine.schema(),
                    &self.values,
                ) {
                    continue;
                }
                if !needle.is_empty()
                    && !def.label.to_lowercase().contains(&needle)
                    && !def.key.to_lowercase().contains(&needle)
                {
                    continue;
                }
                items.push(NavItem {
                    key: def.key.clone(),
                    section: section_idx,
                    controls: controls_for(def),
                });
            }
        }
        NavModel {
            items,
            section_count: page.sections.len(),
        }
    }

    /// Feed one translated key press through the navigator, falling back to
    /// control-level handling for anything it declines.
    pub fn on_key(&mut self, input: KeyInput) {
        if self.engine.pending_confirm().is_some() {
            self.on_confirm_key(input);
            self.drain_changes();
            return;
        }

        if input.ctrl && matches!(input.key, NavKey::Char('q' | 'c')) {
            self.should_quit = true;
            return;
        }

        let model = self.nav_model();
        let ctx = NavContext {
            in_text_edit: self.draft.is_some() || self.search_active,
            in_search: self.search_active,
            search_has_text: !self.search.is_empty(),
        };
        match self.navigator.handle(&model, self.focus, ctx, input) {
            NavOutcome::Focus { tier, .. } => self.apply_focus(tier, &model),
            NavOutcome::SectionJump { section } => {
                if let Some(index) = model.items.iter().position(|item| item.section == section) {
                    self.apply_focus(FocusTier::Item { index }, &model);
                }
            }
            NavOutcome::FocusSearch => {
                self.search_active = true;
                self.draft = None;
                self.focus = FocusTier::None;
            }
            NavOutcome::ClearSearch => self.search.clear(),
            NavOutcome::Handled => {}
            NavOutcome::NotHandled => self.on_unhandled(input, &model),
        }
        self.drain_changes();
    }

    fn on_confirm_key(&mut self, input: KeyInput) {
        match input.key {
            NavKey::Enter | NavKey::Char('y') => self.engine.resolve_confirm(true),
            NavKey::Escape | NavKey::Char('n') => self.engine.resolve_confirm(false),
            _ => {}
        }
    }

    fn apply_focus(&mut self, tier: FocusTier, model: &NavModel) {
        // Managed focus and the search line are mutually exclusive: a pane
        // cycle or section jump out of search must also leave search mode,
        // or the next keystroke would keep editing the search text.
        self.search_active = false;
        self.focus = tier;
        self.sync_draft(model);
    }

    /// Start or stop a text draft so that a focused text control is always
    /// being edited.
    fn sync_draft(&mut self, model: &NavModel) {
        let target = match self.focus {
            FocusTier::Control { item, control } => model.items.get(item).and_then(|nav_item| {
                let is_text = matches!(
                    nav_item.controls.get(control).map(|c| c.kind),
                    Some(ControlKind::TextEdit)
                );
                is_text.then(|| nav_item.key.clone())
            }),
            _ => None,
        };
        match target {
            Some(key) => {
                if self.draft.as_ref().is_none_or(|draft| draft.key != key) {
                    let text = self
                        .engine
                        .value(&self.values, &key)
                        .ok()
                        .flatten()
                        .map(display_text)
                        .unwrap_or_default();
                    self.draft = Some(Draft::new(key, text));
                }
            }
            None => self.draft = None,
        }
    }

    fn on_unhandled(&mut self, input: KeyInput, model: &NavModel) {
        if self.search_active {
            self.on_search_key(input, model);
            return;
        }
        if self.draft.is_some() {
            self.on_draft_key(input);
            return;
        }
        match self.focus {
            FocusTier::Pane(PaneId::Sidebar) => self.on_sidebar_key(input, model),
            FocusTier::Control { item, control } => {
                if matches!(input.key, NavKey::Enter | NavKey::Char(' ')) {
                    self.activate_control(model, item, control);
                }
            }
            _ => {}
        }
    }

    fn on_search_key(&mut self, input: KeyInput, model: &NavModel) {
        match input.key {
            NavKey::Char(ch) => self.search.push(ch),
            NavKey::Backspace => {
                self.search.pop();
            }
            NavKey::Escape => {
                // Non-empty search was already cleared by the navigator.
                self.search_active = false;
                self.focus = FocusTier::Pane(PaneId::Content);
            }
            NavKey::Enter => {
                self.search_active = false;
                if model.items.is_empty() {
                    self.focus = FocusTier::Pane(PaneId::Content);
                } else {
                    self.focus = FocusTier::Item { index: 0 };
                }
            }
            _ => {}
        }
    }

    fn on_draft_key(&mut self, input: KeyInput) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        match input.key {
            NavKey::Char(ch) => draft.insert(ch),
            NavKey::Backspace => draft.backspace(),
            NavKey::Delete => draft.delete(),
            NavKey::Left => draft.cursor = draft.cursor.saturating_sub(1),
            NavKey::Right => draft.cursor = (draft.cursor + 1).min(draft.text.chars().count()),
            NavKey::Home => draft.cursor = 0,
            NavKey::End => draft.cursor = draft.text.chars().count(),
            NavKey::Enter => self.commit_draft(),
            NavKey::Escape => {
                // Cancel the edit and drill out to the owning card.
                self.draft = None;
                if let FocusTier::Control { item, .. } = self.focus {
                    self.focus = FocusTier::Item { index: item };
                }
            }
            _ => {}
        }
    }

    fn commit_draft(&mut self) {
        let Some(draft) = self.draft.clone() else {
            return;
        };
        let Some(def) = self.engine.schema().setting(&draft.key) else {
            return;
        };
        let candidate = match def.kind {
            SettingKind::Number => match draft.text.trim().parse::<f64>() {
                Ok(number) => SettingValue::Number(number),
                Err(_) => {
                    self.local_error = Some((draft.key.clone(), MSG_NOT_A_NUMBER.to_string()));
                    return;
                }
            },
            _ => SettingValue::Text(draft.text.clone()),
        };
        self.local_error = None;
        self.set_value(&draft.key.clone(), candidate);
    }

    fn on_sidebar_key(&mut self, input: KeyInput, model: &NavModel) {
        let pages = self.engine.schema().pages().len();
        match input.key {
            NavKey::Down => {
                if self.selected_page + 1 < pages {
                    self.selected_page += 1;
                }
            }
            NavKey::Up => {
                self.selected_page = self.selected_page.saturating_sub(1);
            }
            NavKey::Enter | NavKey::Right => {
                if !model.items.is_empty() {
                    self.apply_focus(FocusTier::Item { index: 0 }, model);
                }
            }
            _ => {}
        }
    }

    fn activate_control(&mut self, model: &NavModel, item: usize, control: usize) {
        let Some(nav_item) = model.items.get(item) else {
            return;
        };
        let Some(nav_control) = nav_item.controls.get(control) else {
            return;
        };
        if !nav_control.enabled {
            return;
        }
        let key = nav_item.key.clone();
        let Some(def) = self.engine.schema().setting(&key) else {
            return;
        };

        match nav_control.kind {
            ControlKind::Toggle => {
                let current = self
                    .engine
                    .value(&self.values, &key)
                    .ok()
                    .flatten()
                    .and_then(SettingValue::as_bool)
                    .unwrap_or(false);
                self.set_value(&key, SettingValue::Bool(!current));
            }
            ControlKind::Checkbox { .. } => {
                let option = def.options.get(control).map(|option| option.value.clone());
                if let Some(option) = option {
                    let mut selected: Vec<String> = self
                        .engine
                        .value(&self.values, &key)
                        .ok()
                        .flatten()
                        .and_then(SettingValue::as_list)
                        .map(<[String]>::to_vec)
                        .unwrap_or_default();
                    if let Some(at) = selected.iter().position(|entry| *entry == option) {
                        selected.remove(at);
                    } else {
                        selected.push(option);
                    }
                    self.set_value(&key, SettingValue::List(selected));
                }
            }
            ControlKind::Select => {
                if def.options.is_empty() {
                    return;
                }
                let current = self
                    .engine
                    .value(&self.values, &key)
                    .ok()
                    .flatten()
                    .and_then(|value| value.as_text().map(ToString::to_string));
                let at = current
                    .as_deref()
                    .and_then(|value| def.options.iter().position(|option| option.value == value));
                let next = at.map_or(0, |i| (i + 1) % def.options.len());
                let value = def.options[next].value.clone();
                self.set_value(&key, SettingValue::Text(value));
            }
            ControlKind::Button => {
                let id = if def.items.is_empty() {
                    key
                } else if let Some(sub) = def.items.get(control) {
                    format!("{key}/{}", sub.key)
                } else {
                    return;
                };
                self.invoke_action(id);
            }
            ControlKind::TextEdit => {}
        }
    }

    fn set_value(&mut self, key: &str, candidate: SettingValue) {
        if let Err(error) = self.engine.set_value(key, candidate) {
            // Only reachable through a wiring mistake; surface it loudly.
            tracing::error!(%error, "set_value failed");
        }
        self.drain_changes();
    }

    fn invoke_action(&mut self, id: String) {
        let Some(handler) = self.action_handler.clone() else {
            tracing::debug!(action = %id, "no action handler registered");
            return;
        };
        let arena = self.engine.actions().clone();
        self.invocations.push(Box::pin(async move {
            let work = handler(&id);
            arena.invoke(&id, work).await
        }));
    }

    /// Re-validate one key, driving the async validator if registered.
    pub async fn validate(&mut self, key: &str) -> Result<(), EngineError> {
        // Split borrow: validate reads values through a snapshot clone.
        let values = self.values.clone();
        self.engine.validate(&values, key).await
    }
}

/// The interactive controls a setting renders as.
fn controls_for(def: &SettingDef) -> Vec<NavControl> {
    let disable = |control: NavControl| {
        if def.disabled || def.readonly {
            control.disabled()
        } else {
            control
        }
    };
    match def.kind {
        SettingKind::Bool => vec![disable(NavControl::new(ControlKind::Toggle))],
        SettingKind::Text | SettingKind::Number | SettingKind::Date => {
            vec![disable(NavControl::new(ControlKind::TextEdit))]
        }
        SettingKind::Select => vec![disable(NavControl::new(ControlKind::Select))],
        SettingKind::MultiSelect => def
            .options
            .iter()
            .map(|option| {
                disable(NavControl::new(ControlKind::Checkbox {
                    hidden: option.hidden,
                }))
            })
            .collect(),
        SettingKind::Action => {
            if def.items.is_empty() {
                vec![disable(NavControl::new(ControlKind::Button))]
            } else {
                def.items
                    .iter()
                    .map(|_| disable(NavControl::new(ControlKind::Button)))
                    .collect()
            }
        }
    }
}

/// Human-readable value text for drafts and cards.
#[must_use]
pub fn display_text(value: &SettingValue) -> String {
    match value {
        SettingValue::Bool(b) => if *b { "on" } else { "off" }.to_string(),
        SettingValue::Number(n) => {
            if n.fract() == 0.0 {
                format!("{n:.0}")
            } else {
                n.to_string()
            }
        }
        SettingValue::Text(s) => s.clone(),
        SettingValue::List(items) => items.join(", "),
    }
}
