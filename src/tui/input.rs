//! Key routing for the dashboard.
//!
//! Precedence, highest first: the Ctrl-C emergency quit, an open sort menu,
//! an open app overlay, global keys, then the active browser.

#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::focus::BrowserKey;
use super::model::{Overlay, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub view: View,
    pub overlay: Option<Overlay>,
    /// The active browser's sort menu is open.
    pub sort_open: bool,
    /// The active browser is in detail focus or has its sort menu open.
    pub browser_captures: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    CloseOverlay,
    ToggleOverlay(Overlay),
    SwitchView(View),
    NextView,
    Refresh,
    Browser(BrowserKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputResolution {
    pub action: Option<InputAction>,
    pub consumed: bool,
}

impl InputResolution {
    const fn action(action: InputAction) -> Self {
        Self {
            action: Some(action),
            consumed: true,
        }
    }

    const fn consumed_without_action() -> Self {
        Self {
            action: None,
            consumed: true,
        }
    }

    const fn passthrough() -> Self {
        Self {
            action: None,
            consumed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextualHelp {
    pub title: &'static str,
    pub hint: &'static str,
    pub bindings: Vec<HelpBinding>,
}

fn ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Resolve a key event against the current context.
#[must_use]
pub fn resolve_key_event(key: &KeyEvent, context: InputContext) -> InputResolution {
    if matches!(key.code, KeyCode::Char('c')) && ctrl(key) {
        return InputResolution::action(InputAction::Quit);
    }
    if context.sort_open {
        // the sort menu swallows everything it does not understand
        return browser_key(key).map_or_else(InputResolution::consumed_without_action, |k| {
            InputResolution::action(InputAction::Browser(k))
        });
    }
    if let Some(overlay) = context.overlay {
        return resolve_overlay_key(key, overlay);
    }
    let global = resolve_global_key(key, context);
    if global.consumed {
        return global;
    }
    browser_key(key).map_or_else(InputResolution::passthrough, |k| {
        InputResolution::action(InputAction::Browser(k))
    })
}

/// Normalize a terminal key into a browser key.
#[must_use]
pub fn browser_key(key: &KeyEvent) -> Option<BrowserKey> {
    let k = match key.code {
        KeyCode::Char('u') if ctrl(key) => BrowserKey::HalfPageUp,
        KeyCode::Char('d') if ctrl(key) => BrowserKey::HalfPageDown,
        _ if ctrl(key) => return None,
        KeyCode::Up | KeyCode::Char('k') => BrowserKey::Up,
        KeyCode::Down | KeyCode::Char('j') => BrowserKey::Down,
        KeyCode::Home | KeyCode::Char('g') => BrowserKey::Top,
        KeyCode::End | KeyCode::Char('G') => BrowserKey::Bottom,
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l' | 'n') => BrowserKey::NextPage,
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h' | 'p') => BrowserKey::PrevPage,
        KeyCode::Enter => BrowserKey::Open,
        KeyCode::Esc => BrowserKey::Close,
        KeyCode::Char('s') => BrowserKey::Sort,
        _ => return None,
    };
    Some(k)
}

fn resolve_overlay_key(key: &KeyEvent, overlay: Overlay) -> InputResolution {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => InputResolution::action(InputAction::CloseOverlay),
        KeyCode::Char('?') if overlay == Overlay::Help => {
            InputResolution::action(InputAction::ToggleOverlay(Overlay::Help))
        }
        KeyCode::Char('L') if overlay == Overlay::Log => {
            InputResolution::action(InputAction::ToggleOverlay(Overlay::Log))
        }
        _ => InputResolution::consumed_without_action(),
    }
}

fn resolve_global_key(key: &KeyEvent, context: InputContext) -> InputResolution {
    if ctrl(key) {
        return InputResolution::passthrough();
    }
    match key.code {
        KeyCode::Char('q') if context.browser_captures => InputResolution::consumed_without_action(),
        KeyCode::Char('q') => InputResolution::action(InputAction::Quit),
        KeyCode::Tab | KeyCode::BackTab => InputResolution::action(InputAction::NextView),
        KeyCode::Char(c @ '1'..='9') => match View::from_number(c as u8 - b'0') {
            Some(view) => InputResolution::action(InputAction::SwitchView(view)),
            None => InputResolution::consumed_without_action(),
        },
        KeyCode::Char('r') => InputResolution::action(InputAction::Refresh),
        KeyCode::Char('?') => InputResolution::action(InputAction::ToggleOverlay(Overlay::Help)),
        KeyCode::Char('L') => InputResolution::action(InputAction::ToggleOverlay(Overlay::Log)),
        _ => InputResolution::passthrough(),
    }
}

// ──────────────────── help ────────────────────

const GLOBAL_BINDINGS: [HelpBinding; 6] = [
    HelpBinding {
        keys: "Tab / 1 / 2",
        description: "Switch between incidents and alerts",
    },
    HelpBinding {
        keys: "r",
        description: "Reload the current page",
    },
    HelpBinding {
        keys: "?",
        description: "Toggle this help",
    },
    HelpBinding {
        keys: "L",
        description: "Toggle the activity log",
    },
    HelpBinding {
        keys: "q",
        description: "Quit (from the list)",
    },
    HelpBinding {
        keys: "Ctrl-C",
        description: "Quit immediately",
    },
];

const LIST_BINDINGS: [HelpBinding; 6] = [
    HelpBinding {
        keys: "j/k ↑/↓",
        description: "Move the selection",
    },
    HelpBinding {
        keys: "g/G",
        description: "First / last row",
    },
    HelpBinding {
        keys: "n/p ←/→",
        description: "Next / previous page",
    },
    HelpBinding {
        keys: "Enter",
        description: "Load details, then focus the detail pane",
    },
    HelpBinding {
        keys: "Ctrl-d/u",
        description: "Scroll the detail pane",
    },
    HelpBinding {
        keys: "s",
        description: "Sort menu",
    },
];

const DETAIL_BINDINGS: [HelpBinding; 4] = [
    HelpBinding {
        keys: "j/k ↑/↓",
        description: "Scroll one line",
    },
    HelpBinding {
        keys: "n/p PgDn/PgUp",
        description: "Scroll half a page",
    },
    HelpBinding {
        keys: "g/G",
        description: "Top / bottom",
    },
    HelpBinding {
        keys: "Esc",
        description: "Back to the list",
    },
];

const SORT_BINDINGS: [HelpBinding; 3] = [
    HelpBinding {
        keys: "j/k ↑/↓",
        description: "Move the highlight",
    },
    HelpBinding {
        keys: "Enter",
        description: "Sort by the highlighted field (again to flip)",
    },
    HelpBinding {
        keys: "Esc / s",
        description: "Close without sorting",
    },
];

/// Key bindings relevant to the current context.
#[must_use]
pub fn contextual_help(context: InputContext) -> ContextualHelp {
    if context.sort_open {
        return ContextualHelp {
            title: "Sort menu",
            hint: "Enter sort · Esc cancel",
            bindings: SORT_BINDINGS.to_vec(),
        };
    }
    let (title, hint, local): (_, _, &[HelpBinding]) = if context.browser_captures {
        (
            "Detail pane",
            "j/k scroll · n/p page · Esc back · ? help",
            &DETAIL_BINDINGS,
        )
    } else {
        (
            "List pane",
            "j/k move · n/p page · Enter open · s sort · r reload · Tab view · ? help · q quit",
            &LIST_BINDINGS,
        )
    };
    let mut bindings = local.to_vec();
    bindings.extend_from_slice(&GLOBAL_BINDINGS);
    ContextualHelp {
        title,
        hint,
        bindings,
    }
}
