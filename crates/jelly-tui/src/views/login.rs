use jelly_proto::{AppError, Settings};
use ratatui::crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::command::{Command, Secret};
use crate::controller::{Action, Context, Controller};
use crate::message::{Message, ViewTag};
use crate::theme::Theme;
use crate::widgets::text_input::{InputAction, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

pub struct LoginView {
    username: TextInput,
    password: TextInput,
    focus: Field,
}

impl LoginView {
    pub fn new(settings: &Settings) -> Self {
        let username = TextInput::new("username").with_value(&settings.default_user);
        let focus = if username.is_empty() {
            Field::Username
        } else {
            Field::Password
        };
        Self {
            username,
            password: TextInput::new("password").masked(),
            focus,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        };
    }

    fn submit(&mut self, ctx: &Context) -> Action {
        let username = self.username.value().trim().to_string();
        if username.is_empty() {
            self.focus = Field::Username;
            return Action::Emit(AppError::input("username is required").into());
        }
        Action::Run(Command::Authenticate {
            server_url: ctx.settings.server_url.clone(),
            username,
            password: Secret::new(self.password.value()),
        })
    }
}

impl Controller for LoginView {
    fn id(&self) -> ViewTag {
        ViewTag::Login
    }

    fn step(&mut self, msg: &Message, ctx: &Context) -> Vec<Action> {
        match msg {
            Message::ShowLogin => {
                self.password.clear();
                Vec::new()
            }
            Message::Key(key) => match key.code {
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    self.toggle_focus();
                    Vec::new()
                }
                _ => {
                    let field = match self.focus {
                        Field::Username => &mut self.username,
                        Field::Password => &mut self.password,
                    };
                    match field.handle_key(*key) {
                        InputAction::Submitted(_) if self.focus == Field::Username => {
                            self.focus = Field::Password;
                            Vec::new()
                        }
                        InputAction::Submitted(_) => vec![self.submit(ctx)],
                        _ => Vec::new(),
                    }
                }
            },
            _ => Vec::new(),
        }
    }

    fn render(&self, theme: &Theme, ctx: &Context) -> Text<'static> {
        let field_line = |label: &'static str, input: &TextInput, focused: bool| {
            let marker = if focused { "› " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, theme.accent()),
                Span::styled(format!("{label:<10}"), theme.secondary()),
            ];
            spans.extend(input.spans(theme, focused));
            Line::from(spans)
        };

        Text::from(vec![
            Line::from(Span::styled("Sign in", theme.title())),
            Line::from(vec![
                Span::styled("Server    ", theme.secondary()),
                Span::styled(ctx.settings.server_url.clone(), theme.text()),
            ]),
            Line::default(),
            field_line("Username", &self.username, self.focus == Field::Username),
            field_line("Password", &self.password, self.focus == Field::Password),
            Line::default(),
            Line::from(Span::styled(
                "Change the server under Settings once signed in, or edit config.toml.",
                theme.muted(),
            )),
        ])
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn keys_hint(&self) -> &'static str {
        "type credentials  Tab switch field  Enter sign in  F1 help  Ctrl+C quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jelly_proto::ErrorKind;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    fn press(view: &mut LoginView, code: KeyCode, settings: &Settings) -> Vec<Action> {
        let ctx = Context {
            settings,
            session: None,
        };
        view.step(&Message::Key(KeyEvent::new(code, KeyModifiers::NONE)), &ctx)
    }

    fn type_str(view: &mut LoginView, s: &str, settings: &Settings) {
        for c in s.chars() {
            press(view, KeyCode::Char(c), settings);
        }
    }

    #[test]
    fn enter_on_password_authenticates_against_configured_server() {
        let settings = Settings::default();
        let mut view = LoginView::new(&settings);

        type_str(&mut view, "alice", &settings);
        assert!(press(&mut view, KeyCode::Enter, &settings).is_empty());
        type_str(&mut view, "secret", &settings);

        let actions = press(&mut view, KeyCode::Enter, &settings);
        assert_eq!(
            actions,
            vec![Action::Run(Command::Authenticate {
                server_url: "http://localhost:8096".to_string(),
                username: "alice".to_string(),
                password: Secret::new("secret"),
            })]
        );
    }

    #[test]
    fn default_user_is_prefilled_and_focus_starts_on_password() {
        let settings = Settings {
            default_user: "bob".to_string(),
            ..Settings::default()
        };
        let mut view = LoginView::new(&settings);
        type_str(&mut view, "pw", &settings);

        match press(&mut view, KeyCode::Enter, &settings).as_slice() {
            [Action::Run(Command::Authenticate { username, password, .. })] => {
                assert_eq!(username, "bob");
                assert_eq!(password.expose(), "pw");
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn empty_username_is_an_input_error() {
        let settings = Settings::default();
        let mut view = LoginView::new(&settings);
        press(&mut view, KeyCode::Tab, &settings);

        match press(&mut view, KeyCode::Enter, &settings).as_slice() {
            [Action::Emit(Message::ErrorOccurred(err))] => assert_eq!(err.kind, ErrorKind::Input),
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn rendered_text_masks_password() {
        let settings = Settings::default();
        let mut view = LoginView::new(&settings);
        type_str(&mut view, "alice", &settings);
        press(&mut view, KeyCode::Tab, &settings);
        type_str(&mut view, "hunter2", &settings);

        let ctx = Context {
            settings: &settings,
            session: None,
        };
        let rendered = format!("{:?}", view.render(&Theme::default(), &ctx));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
