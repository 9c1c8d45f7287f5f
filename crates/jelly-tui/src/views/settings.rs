use ratatui::crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::controller::{Action, Context, Controller};
use crate::message::{Message, SettingField, ViewTag};
use crate::theme::Theme;
use crate::widgets::list_cursor::ListCursor;

const HEADER_LINES: usize = 2;

#[derive(Default)]
pub struct SettingsView {
    cursor: ListCursor,
}

impl Controller for SettingsView {
    fn id(&self) -> ViewTag {
        ViewTag::Settings
    }

    fn step(&mut self, msg: &Message, ctx: &Context) -> Vec<Action> {
        let Message::Key(key) = msg else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.down(SettingField::ALL.len()),
            KeyCode::Enter => {
                if let Some(field) = self.cursor.pick(&SettingField::ALL) {
                    return vec![Action::Emit(Message::ShowEditSetting { field: *field })];
                }
            }
            KeyCode::Esc => {
                let back = if ctx.session.is_some() {
                    Message::ShowBrowse
                } else {
                    Message::ShowLogin
                };
                return vec![Action::Emit(back)];
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, theme: &Theme, ctx: &Context) -> Text<'static> {
        let mut lines = vec![
            Line::from(Span::styled("Settings", theme.title())),
            Line::default(),
        ];
        for (i, field) in SettingField::ALL.iter().enumerate() {
            let is_cursor = i == self.cursor.get();
            let value = field.current(ctx.settings);
            lines.push(Line::from(vec![
                Span::styled(if is_cursor { "› " } else { "  " }, theme.accent()),
                Span::styled(
                    format!("{:<16}", field.label()),
                    if is_cursor { theme.selected() } else { theme.secondary() },
                ),
                if value.is_empty() {
                    Span::styled("(not set)", theme.muted())
                } else {
                    Span::styled(value, theme.text())
                },
            ]));
        }
        Text::from(lines)
    }

    fn cursor_row(&self) -> Option<usize> {
        Some(HEADER_LINES + self.cursor.get())
    }

    fn keys_hint(&self) -> &'static str {
        "↑↓/jk move  Enter edit  Esc back  ? help  q quit"
    }
}
