use ratatui::text::{Line, Span, Text};

use crate::controller::{Action, Context, Controller};
use crate::message::{Message, SettingField, ViewTag};
use crate::theme::Theme;
use crate::widgets::text_input::{InputAction, TextInput};

/// Editor for one setting. Lives only for a single edit session.
pub struct EditSettingView {
    field: SettingField,
    input: TextInput,
}

impl EditSettingView {
    pub fn new(field: SettingField, current: &str) -> Self {
        Self {
            field,
            input: TextInput::new(field.label()).with_value(current),
        }
    }

    pub fn field(&self) -> SettingField {
        self.field
    }
}

impl Controller for EditSettingView {
    fn id(&self) -> ViewTag {
        ViewTag::EditSetting
    }

    fn step(&mut self, msg: &Message, _ctx: &Context) -> Vec<Action> {
        let Message::Key(key) = msg else {
            return Vec::new();
        };
        match self.input.handle_key(*key) {
            InputAction::Submitted(value) => vec![
                Action::Emit(Message::SettingsUpdated {
                    field: self.field,
                    value,
                }),
                Action::Emit(Message::ShowSettings),
            ],
            InputAction::Cancelled => vec![Action::Emit(Message::ShowSettings)],
            InputAction::Changed | InputAction::Ignored => Vec::new(),
        }
    }

    fn render(&self, theme: &Theme, ctx: &Context) -> Text<'static> {
        let mut value = vec![Span::styled("New value: ", theme.secondary())];
        value.extend(self.input.spans(theme, true));
        Text::from(vec![
            Line::from(Span::styled(format!("Edit {}", self.field.label()), theme.title())),
            Line::from(vec![
                Span::styled("Current:   ", theme.secondary()),
                Span::styled(self.field.current(ctx.settings), theme.text()),
            ]),
            Line::default(),
            Line::from(value),
        ])
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn keys_hint(&self) -> &'static str {
        "type value  Enter save  Esc cancel"
    }
}
