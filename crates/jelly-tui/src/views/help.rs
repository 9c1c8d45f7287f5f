//! Help: keyboard reference for every view.

use ratatui::crossterm::event::KeyCode;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span, Text};

use crate::controller::{Action, Context, Controller};
use crate::message::{Message, ViewTag};
use crate::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("q / Ctrl+C", "quit (Ctrl+C also while typing)"),
            ("? / h / F1", "this help"),
            ("any key", "dismiss an error"),
        ],
    ),
    (
        "Login",
        &[("Tab", "switch field"), ("Enter", "next field / sign in")],
    ),
    (
        "Browse",
        &[
            ("↑↓ / j k", "move"),
            ("Space", "mark item"),
            ("Enter", "open details"),
            ("n / p", "next / previous page"),
            ("f or /", "filter by item type"),
            ("s", "search"),
            ("l", "playlists"),
            ("o", "settings"),
            ("r", "reload page"),
        ],
    ),
    (
        "Details",
        &[
            ("Enter", "play in mpv"),
            ("p", "add to playlist"),
            ("Esc", "back to browse"),
        ],
    ),
    (
        "Search",
        &[
            ("Enter", "search, or open the highlighted result"),
            ("↑↓", "move"),
            ("Esc", "back to browse"),
        ],
    ),
    (
        "Playlists",
        &[
            ("Enter", "add the pending item"),
            ("n", "new playlist"),
            ("r", "refresh"),
        ],
    ),
    (
        "Settings",
        &[("Enter", "edit"), ("Enter / Esc", "save / cancel while editing")],
    ),
];

#[derive(Default)]
pub struct HelpView;

fn help_row(key: &'static str, desc: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{key:<16}"), theme.title()),
        Span::styled(desc, theme.secondary()),
    ])
}

impl Controller for HelpView {
    fn id(&self) -> ViewTag {
        ViewTag::Help
    }

    fn step(&mut self, msg: &Message, ctx: &Context) -> Vec<Action> {
        match msg {
            Message::Key(key) if matches!(key.code, KeyCode::Esc | KeyCode::Enter) => {
                let back = if ctx.session.is_some() {
                    Message::ShowBrowse
                } else {
                    Message::ShowLogin
                };
                vec![Action::Emit(back)]
            }
            _ => Vec::new(),
        }
    }

    fn render(&self, theme: &Theme, _ctx: &Context) -> Text<'static> {
        let mut lines = Vec::new();
        for (title, rows) in SECTIONS {
            lines.push(Line::from(Span::styled(
                *title,
                theme.accent().add_modifier(Modifier::BOLD),
            )));
            lines.extend(rows.iter().map(|(key, desc)| help_row(*key, *desc, theme)));
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled("Esc to close", theme.muted())));
        Text::from(lines)
    }

    fn keys_hint(&self) -> &'static str {
        "Esc close  q quit"
    }
}
