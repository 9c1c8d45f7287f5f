//! Playlists: list, attach the item picked in Details, or create a new one.

use jelly_proto::{AppError, Playlist};
use ratatui::crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::command::Command;
use crate::controller::{Action, Context, Controller};
use crate::message::{Message, ViewTag};
use crate::theme::Theme;
use crate::widgets::list_cursor::ListCursor;
use crate::widgets::text_input::{InputAction, TextInput};

const HEADER_LINES: usize = 3;

#[derive(Default)]
pub struct PlaylistView {
    playlists: Vec<Playlist>,
    cursor: ListCursor,
    /// Item waiting to be attached, set by `AddToPlaylist`.
    selected_item_id: Option<String>,
    /// `Some` while naming a new playlist.
    naming: Option<TextInput>,
    status: Option<String>,
    loading: bool,
}

impl PlaylistView {
    pub fn selected_item_id(&self) -> Option<&str> {
        self.selected_item_id.as_deref()
    }

    pub fn is_naming(&self) -> bool {
        self.naming.is_some()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn refresh(&mut self) -> Command {
        self.loading = true;
        Command::FetchPlaylists
    }

    fn attach(&self) -> Action {
        let Some(item_id) = &self.selected_item_id else {
            return Action::Emit(
                AppError::input("no item selected: open an item and press p").into(),
            );
        };
        match self.cursor.pick(&self.playlists) {
            Some(playlist) => Action::Run(Command::AttachItem {
                playlist_id: playlist.id.clone(),
                item_id: item_id.clone(),
            }),
            None => Action::Emit(AppError::input("no playlist selected").into()),
        }
    }

    fn step_naming(&mut self, msg: &Message) -> Vec<Action> {
        let (Message::Key(key), Some(input)) = (msg, self.naming.as_mut()) else {
            return Vec::new();
        };
        match input.handle_key(*key) {
            InputAction::Submitted(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return vec![Action::Emit(
                        AppError::input("playlist name cannot be empty").into(),
                    )];
                }
                self.naming = None;
                vec![Action::Run(Command::CreatePlaylist { name })]
            }
            InputAction::Cancelled => {
                self.naming = None;
                Vec::new()
            }
            InputAction::Changed | InputAction::Ignored => Vec::new(),
        }
    }
}

impl Controller for PlaylistView {
    fn id(&self) -> ViewTag {
        ViewTag::Playlist
    }

    fn init(&mut self, _ctx: &Context) -> Option<Command> {
        Some(self.refresh())
    }

    fn step(&mut self, msg: &Message, _ctx: &Context) -> Vec<Action> {
        match msg {
            Message::ShowPlaylist => {
                self.selected_item_id = None;
                self.naming = None;
                self.status = None;
                return Vec::new();
            }
            Message::AddToPlaylist { item_id } => {
                self.selected_item_id = Some(item_id.clone());
                self.naming = None;
                self.status = None;
                return Vec::new();
            }
            Message::ShowCreatePlaylist => {
                self.naming = Some(TextInput::new("playlist name"));
                self.status = None;
                return Vec::new();
            }
            Message::PlaylistsLoaded { playlists } => {
                self.playlists = playlists.clone();
                self.loading = false;
                self.cursor.clamp(self.playlists.len());
                return Vec::new();
            }
            Message::ErrorOccurred(_) => {
                self.loading = false;
                return Vec::new();
            }
            Message::PlaylistUpdateConfirmed { message } => {
                self.status = Some(message.clone());
                return vec![Action::Run(self.refresh())];
            }
            _ => {}
        }

        if self.naming.is_some() {
            return self.step_naming(msg);
        }
        let Message::Key(key) = msg else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.down(self.playlists.len()),
            KeyCode::Enter => return vec![self.attach()],
            KeyCode::Char('n') => return vec![Action::Emit(Message::ShowCreatePlaylist)],
            KeyCode::Char('r') => return vec![Action::Run(self.refresh())],
            KeyCode::Esc => return vec![Action::Emit(Message::ShowBrowse)],
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, theme: &Theme, _ctx: &Context) -> Text<'static> {
        let target = match &self.selected_item_id {
            Some(id) => Line::from(vec![
                Span::styled("Adding item ", theme.secondary()),
                Span::styled(id.clone(), theme.marked()),
                Span::styled(": pick a playlist and press Enter", theme.secondary()),
            ]),
            None => Line::from(Span::styled(
                "Open an item and press p to add it to a playlist.",
                theme.muted(),
            )),
        };
        let status = match (&self.naming, &self.status) {
            (Some(input), _) => {
                let mut spans = vec![Span::styled("New playlist: ", theme.secondary())];
                spans.extend(input.spans(theme, true));
                Line::from(spans)
            }
            (None, Some(status)) => Line::from(Span::styled(status.clone(), theme.success())),
            (None, None) => Line::default(),
        };

        let mut lines = vec![target, status, Line::default()];
        if self.playlists.is_empty() {
            let empty = if self.loading {
                "Loading…"
            } else {
                "No playlists yet. Press n to create one."
            };
            lines.push(Line::from(Span::styled(empty, theme.muted())));
        }
        for (i, playlist) in self.playlists.iter().enumerate() {
            let is_cursor = i == self.cursor.get();
            lines.push(Line::from(vec![
                Span::styled(if is_cursor { "› " } else { "  " }, theme.accent()),
                Span::styled(
                    playlist.name.clone(),
                    if is_cursor { theme.selected() } else { theme.text() },
                ),
            ]));
        }
        Text::from(lines)
    }

    fn captures_text(&self) -> bool {
        self.naming.is_some()
    }

    fn cursor_row(&self) -> Option<usize> {
        Some(HEADER_LINES + self.cursor.get())
    }

    fn keys_hint(&self) -> &'static str {
        if self.naming.is_some() {
            "type a name  Enter create  Esc cancel"
        } else {
            "↑↓/jk move  Enter add item  n new playlist  r refresh  Esc back  ? help  q quit"
        }
    }
}
