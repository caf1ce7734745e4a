//! Key model and the Browse-mode keymap.
//!
//! Front-ends translate their native key events into [`Key`]; the
//! annotation state machine only ever sees this type.

/// A key press, reduced to what the annotation panel distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    /// A letter pressed with Ctrl, stored lowercase.
    Ctrl(char),
    Up,
    Down,
    Enter,
    Backspace,
    Esc,
    /// Anything else (function keys, arrows we ignore, ...).
    Other,
}

/// Commands available while browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Up,
    Down,
    Top,
    Bottom,
    ToggleMark,
    Annotate,
    CaptureVisible,
    CaptureRange,
    ClearAll,
    Export,
    PasteToPane,
    ViewNote,
    Help,
    ShrinkPanel,
    ExpandPanel,
    Quit,
}

/// Default Browse-mode bindings.
pub const BROWSE_BINDINGS: &[(Key, BrowseAction)] = &[
    (Key::Char('k'), BrowseAction::Up),
    (Key::Up, BrowseAction::Up),
    (Key::Char('j'), BrowseAction::Down),
    (Key::Down, BrowseAction::Down),
    (Key::Char('g'), BrowseAction::Top),
    (Key::Char('G'), BrowseAction::Bottom),
    (Key::Char('m'), BrowseAction::ToggleMark),
    (Key::Char('c'), BrowseAction::Annotate),
    (Key::Char('r'), BrowseAction::CaptureVisible),
    (Key::Char('R'), BrowseAction::CaptureRange),
    (Key::Ctrl('r'), BrowseAction::ClearAll),
    (Key::Char('S'), BrowseAction::Export),
    (Key::Char('P'), BrowseAction::PasteToPane),
    (Key::Char('v'), BrowseAction::ViewNote),
    (Key::Enter, BrowseAction::ViewNote),
    (Key::Char('?'), BrowseAction::Help),
    (Key::Char('/'), BrowseAction::Help),
    (Key::Char('['), BrowseAction::ShrinkPanel),
    (Key::Char(']'), BrowseAction::ExpandPanel),
    (Key::Char('q'), BrowseAction::Quit),
];

/// Commits the note being typed.
pub const COMMIT_NOTE: Key = Key::Ctrl('s');

impl BrowseAction {
    pub fn from_key(key: Key) -> Option<Self> {
        BROWSE_BINDINGS
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, action)| *action)
    }

    /// Label shown in the help overlay.
    pub fn description(self) -> &'static str {
        match self {
            BrowseAction::Up => "move up",
            BrowseAction::Down => "move down",
            BrowseAction::Top => "jump to top",
            BrowseAction::Bottom => "jump to bottom",
            BrowseAction::ToggleMark => "toggle mark",
            BrowseAction::Annotate => "mark + note",
            BrowseAction::CaptureVisible => "capture visible area",
            BrowseAction::CaptureRange => "capture N lines (empty = full scrollback)",
            BrowseAction::ClearAll => "clear all content and marks",
            BrowseAction::Export => "copy marks to clipboard",
            BrowseAction::PasteToPane => "paste marks to left pane",
            BrowseAction::ViewNote => "view note",
            BrowseAction::Help => "help",
            BrowseAction::ShrinkPanel => "shrink content panel",
            BrowseAction::ExpandPanel => "expand content panel",
            BrowseAction::Quit => "quit",
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Ctrl(c) => write!(f, "ctrl+{c}"),
            Key::Up => f.write_str("↑"),
            Key::Down => f.write_str("↓"),
            Key::Enter => f.write_str("enter"),
            Key::Backspace => f.write_str("backspace"),
            Key::Esc => f.write_str("esc"),
            Key::Other => f.write_str("?"),
        }
    }
}

/// Help overlay rows: every binding key for an action, joined with `/`.
pub fn help_rows() -> Vec<(String, &'static str)> {
    let mut rows: Vec<(String, BrowseAction)> = Vec::new();
    for (key, action) in BROWSE_BINDINGS {
        match rows.iter_mut().find(|(_, a)| a == action) {
            Some((keys, _)) => {
                keys.push('/');
                keys.push_str(&key.to_string());
            }
            None => rows.push((key.to_string(), *action)),
        }
    }
    rows.into_iter()
        .map(|(keys, action)| (keys, action.description()))
        .collect()
}
