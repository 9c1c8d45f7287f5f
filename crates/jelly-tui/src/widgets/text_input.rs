//! TextInput: wraps tui-input for the login fields, search box and editors.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::text::Span;
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::Theme;

const CARET: &str = "▏";
const MASK: char = '•';

#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Changed,
    Submitted(String),
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    input: Input,
    placeholder: String,
    masked: bool,
}

impl TextInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
            masked: false,
        }
    }

    /// Render every character as a bullet.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    /// Handle a key event. Returns what happened.
    ///
    /// Enter submits the current text and Esc cancels; neither touches the buffer.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Enter => InputAction::Submitted(self.input.value().to_string()),
            KeyCode::Esc => InputAction::Cancelled,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => InputAction::Ignored,
            _ => match self.input.handle_event(&Event::Key(key)) {
                Some(_) => InputAction::Changed,
                None => InputAction::Ignored,
            },
        }
    }

    pub fn spans(&self, theme: &Theme, focused: bool) -> Vec<Span<'static>> {
        if self.is_empty() && !focused {
            return vec![Span::styled(self.placeholder.clone(), theme.muted())];
        }

        let shown: String = if self.masked {
            self.input.value().chars().map(|_| MASK).collect()
        } else {
            self.input.value().to_string()
        };
        let style = if focused { theme.input() } else { theme.text() };
        if !focused {
            return vec![Span::styled(shown, style)];
        }

        let split = shown
            .char_indices()
            .nth(self.input.cursor())
            .map(|(i, _)| i)
            .unwrap_or(shown.len());
        let (before, after) = shown.split_at(split);
        vec![
            Span::styled(before.to_string(), style),
            Span::styled(CARET, theme.accent()),
            Span::styled(after.to_string(), style),
        ]
    }
}
