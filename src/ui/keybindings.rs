//! Key decoding for the caption view

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Quit,
    SelectTypedPath,
    Generate,
    Copy,
    ClearInput,
    Backspace,
    Insert(char),
}

/// Map a key event to an action; `None` for keys the view ignores.
pub fn action_for_key(key: &KeyEvent) -> Option<UiAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Some(UiAction::Quit),
        KeyCode::Char('c') if ctrl => Some(UiAction::Quit),
        KeyCode::Char('g') if ctrl => Some(UiAction::Generate),
        KeyCode::Char('y') if ctrl => Some(UiAction::Copy),
        KeyCode::Char('u') if ctrl => Some(UiAction::ClearInput),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(UiAction::Insert(c)),
        KeyCode::Enter => Some(UiAction::SelectTypedPath),
        KeyCode::Backspace => Some(UiAction::Backspace),
        _ => None,
    }
}
