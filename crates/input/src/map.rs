//! Key mapping from terminal events to game actions.

use crate::types::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

/// Keys that repeat while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldKey {
    Left,
    Right,
    SoftDrop,
}

impl HeldKey {
    /// The move dispatched on each repeat
    pub fn action(self) -> Action {
        match self {
            HeldKey::Left => Action::move_left(),
            HeldKey::Right => Action::move_right(),
            HeldKey::SoftDrop => Action::tick(),
        }
    }
}

/// Map a key to the held movement it controls, if any.
pub fn held_key(code: KeyCode) -> Option<HeldKey> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(HeldKey::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(HeldKey::Right),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(HeldKey::SoftDrop),
        _ => None,
    }
}

/// Map a key press to a one-shot action.
///
/// Movement keys return `None`; they go through [`crate::RepeatPoller`].
pub fn handle_key_event(key: KeyEvent) -> Option<Action> {
    if should_quit(key) {
        return None;
    }

    match key.code {
        // Rotation
        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(Action::Rotate { clockwise: true })
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Action::Rotate { clockwise: false }),

        // Actions
        KeyCode::Char(' ') => Some(Action::HardDrop),
        KeyCode::Char('c')
        | KeyCode::Char('C')
        | KeyCode::Modifier(ModifierKeyCode::LeftShift)
        | KeyCode::Modifier(ModifierKeyCode::RightShift) => Some(Action::Hold),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Pause),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
