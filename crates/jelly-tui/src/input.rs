//! Key translation: terminal key presses into messages.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::message::Message;

pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Global keys first, then the active view gets the raw key.
///
/// While the view captures text only Ctrl+C and F1 stay global, so `q` and `?` can be typed.
pub fn translate(key: KeyEvent, captures_text: bool) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_interrupt(&key) {
        return Some(Message::Quit);
    }
    match key.code {
        KeyCode::F(1) => return Some(Message::ShowHelp),
        KeyCode::Char('q') if !captures_text => return Some(Message::Quit),
        KeyCode::Char('?') | KeyCode::Char('h') if !captures_text => {
            return Some(Message::ShowHelp)
        }
        _ => {}
    }
    Some(Message::Key(key))
}
