//! Keyboard focus model and navigation.
//!
//! The engine owns the focus *logic*, not the terminal: keys arrive as
//! [`KeyInput`] (translated from the real event source by the rendering
//! layer) and the rendered tree is described by a [`NavModel`] built fresh
//! from what is actually on screen. The current [`FocusTier`] is likewise
//! derived by the renderer from the actually-focused element and passed in,
//! never stored redundantly here, so it cannot drift after a re-render.
//!
//! Focus has four tiers: pane, list item ("card"), sub-control inside a
//! card, and the checkbox refinement of a sub-control. The [`Navigator`]
//! implements the transition rules between them.

mod navigator;

pub use navigator::Navigator;

/// One of the two top-level navigable regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneId {
    Sidebar,
    Content,
}

/// Where keyboard focus currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTier {
    /// No managed focus (e.g. the search field owns focus).
    #[default]
    None,
    Pane(PaneId),
    /// A card representing one visible setting.
    Item { index: usize },
    /// An interactive element inside a card.
    Control { item: usize, control: usize },
}

/// What kind of interactive element a control is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Button,
    Toggle,
    Select,
    /// Free-text editing control; navigation keys are never hijacked here.
    TextEdit,
    /// One checkbox of a multi-select group. `hidden` marks it invisible to
    /// keyboard navigation and assistive technology.
    Checkbox { hidden: bool },
}

/// One interactive sub-control of a card, as rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControl {
    pub kind: ControlKind,
    pub enabled: bool,
    /// Explicitly removed from the tab order (decorative buttons etc.).
    pub skip: bool,
}

impl NavControl {
    #[must_use]
    pub fn new(kind: ControlKind) -> Self {
        Self {
            kind,
            enabled: true,
            skip: false,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    #[must_use]
    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Drill-in eligibility: enabled, tab-reachable, visible.
    #[must_use]
    pub fn eligible(&self) -> bool {
        self.enabled && !self.skip && !matches!(self.kind, ControlKind::Checkbox { hidden: true })
    }
}

/// One navigable card.
#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    /// Stable per-item identity (the setting key).
    pub key: String,
    /// Index of the section heading this card sits under.
    pub section: usize,
    pub controls: Vec<NavControl>,
}

/// Snapshot of the rendered, navigable tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavModel {
    pub items: Vec<NavItem>,
    /// Number of section heading landmarks for Ctrl/Meta+Arrow jumps.
    pub section_count: usize,
}

/// Key identity after translation from the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Escape,
    Backspace,
    Delete,
    /// The global pane-cycle shortcut (F6 in the default bindings).
    PaneCycle,
    Char(char),
}

/// A translated key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: NavKey,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyInput {
    #[must_use]
    pub fn plain(key: NavKey) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    #[must_use]
    pub fn ctrl(key: NavKey) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    #[must_use]
    pub fn shifted(key: NavKey) -> Self {
        Self {
            shift: true,
            ..Self::plain(key)
        }
    }

    #[must_use]
    pub fn has_section_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Facts about the focused surroundings the navigator cannot see itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavContext {
    /// The focused element is a free-text editing control.
    pub in_text_edit: bool,
    /// The search field owns focus.
    pub in_search: bool,
    /// The search field is non-empty.
    pub search_has_text: bool,
}

/// The result of feeding one key to the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Not ours; let the focused control handle it natively.
    NotHandled,
    /// Consumed without a focus change (boundary clamp, empty list).
    Handled,
    /// Move focus. `scroll` requests scrolling the destination into view.
    Focus { tier: FocusTier, scroll: bool },
    /// Jump to a section heading landmark.
    SectionJump { section: usize },
    /// Activate the search field.
    FocusSearch,
    /// Clear the (non-empty) search field.
    ClearSearch,
}
