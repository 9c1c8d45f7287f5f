use jelly_proto::{stream_url, AppError, MediaItem};
use ratatui::crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::command::{Command, Secret};
use crate::controller::{Action, Context, Controller};
use crate::message::{Message, ViewTag};
use crate::theme::Theme;

#[derive(Default)]
pub struct DetailView {
    item: Option<MediaItem>,
    loading: bool,
}

impl DetailView {
    pub fn item(&self) -> Option<&MediaItem> {
        self.item.as_ref()
    }
}

impl Controller for DetailView {
    fn id(&self) -> ViewTag {
        ViewTag::Detail
    }

    fn init(&mut self, _ctx: &Context) -> Option<Command> {
        let item = self.item.as_ref()?;
        self.loading = true;
        Some(Command::FetchItemDetail {
            item_id: item.id.clone(),
        })
    }

    fn step(&mut self, msg: &Message, ctx: &Context) -> Vec<Action> {
        match msg {
            Message::ShowDetail { item } => {
                self.item = Some(item.clone());
            }
            Message::ItemDetailLoaded { item } => {
                // a late reply for an item we already left is dropped
                if self.item.as_ref().is_some_and(|cur| cur.id == item.id) {
                    self.item = Some(item.clone());
                    self.loading = false;
                }
            }
            Message::ErrorOccurred(_) => self.loading = false,
            Message::Key(key) => {
                let Some(item) = &self.item else {
                    return match key.code {
                        KeyCode::Esc | KeyCode::Backspace => vec![Action::Emit(Message::ShowBrowse)],
                        _ => Vec::new(),
                    };
                };
                match key.code {
                    KeyCode::Enter => {
                        return match ctx.session {
                            Some(session) => vec![Action::Run(Command::PlayMedia {
                                locator: Secret::new(stream_url(session, &item.id)),
                            })],
                            None => vec![Action::Emit(
                                AppError::authentication("sign in before playing").into(),
                            )],
                        };
                    }
                    KeyCode::Char('p') => {
                        return vec![Action::Emit(Message::AddToPlaylist {
                            item_id: item.id.clone(),
                        })];
                    }
                    KeyCode::Char('s') => return vec![Action::Emit(Message::ShowSearch)],
                    KeyCode::Esc | KeyCode::Backspace => {
                        return vec![Action::Emit(Message::ShowBrowse)];
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, theme: &Theme, _ctx: &Context) -> Text<'static> {
        let Some(item) = &self.item else {
            return Text::from(Line::from(Span::styled("Nothing selected.", theme.muted())));
        };

        let row = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<9}"), theme.secondary()),
                Span::styled(value, theme.text()),
            ])
        };

        let mut lines = vec![Line::from(Span::styled(item.name.clone(), theme.title()))];
        if self.loading {
            lines.push(Line::from(Span::styled("loading details…", theme.muted())));
        }
        lines.push(Line::default());
        lines.push(row("Type", item.item_type.clone()));
        if let Some(year) = item.production_year {
            lines.push(row("Year", year.to_string()));
        }
        if let Some(minutes) = item.runtime_minutes() {
            lines.push(row("Runtime", format!("{minutes} min")));
        }
        if let Some(rating) = item.rating() {
            lines.push(row("Rating", format!("{rating:.1}")));
        }
        if let Some(overview) = item.overview.as_deref().filter(|o| !o.is_empty()) {
            lines.push(Line::default());
            lines.extend(
                overview
                    .lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), theme.text()))),
            );
        }
        Text::from(lines)
    }

    fn keys_hint(&self) -> &'static str {
        "Enter play  p add to playlist  s search  Esc back  ? help  q quit"
    }
}
