//! Browse: one page of the library at a time, with marking and a type filter.

use std::collections::BTreeSet;

use jelly_proto::{MediaItem, Settings};
use ratatui::crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::command::Command;
use crate::controller::{Action, Context, Controller};
use crate::message::{Message, ViewTag};
use crate::theme::Theme;
use crate::widgets::list_cursor::ListCursor;
use crate::widgets::text_input::{InputAction, TextInput};

const HEADER_LINES: usize = 2;

pub struct BrowseView {
    items: Vec<MediaItem>,
    cursor: ListCursor,
    /// Marked rows, as indices into the current page.
    selected: BTreeSet<usize>,
    page: usize,
    per_page: usize,
    total_items: usize,
    filter: String,
    filter_input: TextInput,
    filtering: bool,
    loading: bool,
}

impl BrowseView {
    pub fn new(settings: &Settings) -> Self {
        Self {
            items: Vec::new(),
            cursor: ListCursor::default(),
            selected: BTreeSet::new(),
            page: 1,
            per_page: settings.items_per_page.max(1),
            total_items: 0,
            filter: String::new(),
            filter_input: TextInput::new("Movie, Series, Episode…"),
            filtering: false,
            loading: false,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn can_next(&self) -> bool {
        self.page * self.per_page < self.total_items
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    fn fetch(&mut self) -> Command {
        self.loading = true;
        Command::FetchPage {
            page: self.page,
            per_page: self.per_page,
            filter: self.filter.clone(),
        }
    }

    /// Move to another page or filter. Marks are page-relative, so they go too.
    fn turn_to(&mut self, page: usize) -> Vec<Action> {
        self.page = page;
        self.selected.clear();
        self.cursor.reset();
        vec![Action::Run(self.fetch())]
    }

    fn toggle_selection(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let idx = self.cursor.get();
        if !self.selected.remove(&idx) {
            self.selected.insert(idx);
        }
    }

    fn step_filter(&mut self, msg: &Message) -> Vec<Action> {
        let Message::Key(key) = msg else {
            return Vec::new();
        };
        match self.filter_input.handle_key(*key) {
            InputAction::Submitted(value) => {
                self.filtering = false;
                self.filter = value.trim().to_string();
                self.turn_to(1)
            }
            InputAction::Cancelled => {
                self.filtering = false;
                self.filter_input.set_value(&self.filter);
                Vec::new()
            }
            InputAction::Changed | InputAction::Ignored => Vec::new(),
        }
    }
}

impl Controller for BrowseView {
    fn id(&self) -> ViewTag {
        ViewTag::Browse
    }

    fn init(&mut self, ctx: &Context) -> Option<Command> {
        let per_page = ctx.settings.items_per_page.max(1);
        if per_page != self.per_page {
            self.per_page = per_page;
            self.page = 1;
            self.selected.clear();
            self.cursor.reset();
        }
        Some(self.fetch())
    }

    fn step(&mut self, msg: &Message, _ctx: &Context) -> Vec<Action> {
        if let Message::MediaItemsLoaded { items, total_items } = msg {
            self.items = items.clone();
            self.total_items = *total_items;
            self.loading = false;
            self.cursor.clamp(self.items.len());
            let len = self.items.len();
            self.selected.retain(|i| *i < len);
            return Vec::new();
        }
        if let Message::ErrorOccurred(_) = msg {
            self.loading = false;
            return Vec::new();
        }
        if self.filtering {
            return self.step_filter(msg);
        }
        let Message::Key(key) = msg else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.down(self.items.len()),
            KeyCode::Char(' ') => self.toggle_selection(),
            KeyCode::Enter => {
                if let Some(item) = self.cursor.pick(&self.items) {
                    return vec![Action::Emit(Message::ShowDetail { item: item.clone() })];
                }
            }
            KeyCode::Char('n') | KeyCode::Right if self.can_next() => {
                return self.turn_to(self.page + 1);
            }
            KeyCode::Char('p') | KeyCode::Left if self.can_prev() => {
                return self.turn_to(self.page - 1);
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.filtering = true;
                self.filter_input.set_value(&self.filter);
            }
            KeyCode::Char('r') => return vec![Action::Run(self.fetch())],
            KeyCode::Char('s') => return vec![Action::Emit(Message::ShowSearch)],
            KeyCode::Char('l') => return vec![Action::Emit(Message::ShowPlaylist)],
            KeyCode::Char('o') => return vec![Action::Emit(Message::ShowSettings)],
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, theme: &Theme, _ctx: &Context) -> Text<'static> {
        let mut status = vec![
            Span::styled(
                format!("Page {} of {}", self.page, self.page_count()),
                theme.title(),
            ),
            Span::styled(format!("  ·  {} items", self.total_items), theme.secondary()),
        ];
        if !self.selected.is_empty() {
            status.push(Span::styled(
                format!("  ·  {} marked", self.selected.len()),
                theme.marked(),
            ));
        }
        if self.loading {
            status.push(Span::styled("  ·  loading…", theme.muted()));
        }

        let filter_line = if self.filtering {
            let mut spans = vec![Span::styled("type: ", theme.secondary())];
            spans.extend(self.filter_input.spans(theme, true));
            Line::from(spans)
        } else if self.filter.is_empty() {
            Line::from(Span::styled("type: all", theme.muted()))
        } else {
            Line::from(Span::styled(format!("type: {}", self.filter), theme.secondary()))
        };

        let mut lines = vec![Line::from(status), filter_line];
        if self.items.is_empty() {
            let empty = if self.loading { "Loading…" } else { "No items." };
            lines.push(Line::from(Span::styled(empty, theme.muted())));
        }
        for (i, item) in self.items.iter().enumerate() {
            let is_cursor = i == self.cursor.get();
            let mark = if self.selected.contains(&i) { "● " } else { "  " };
            let style = if is_cursor { theme.selected() } else { theme.text() };
            lines.push(Line::from(vec![
                Span::styled(if is_cursor { "› " } else { "  " }, theme.accent()),
                Span::styled(mark, theme.marked()),
                Span::styled(item.label(), style),
            ]));
        }
        Text::from(lines)
    }

    fn captures_text(&self) -> bool {
        self.filtering
    }

    fn cursor_row(&self) -> Option<usize> {
        Some(HEADER_LINES + self.cursor.get())
    }

    fn keys_hint(&self) -> &'static str {
        if self.filtering {
            "type an item type  Enter apply  Esc cancel"
        } else {
            "↑↓/jk move  Space mark  Enter open  n/p page  f filter  s search  l playlists  o settings  ? help  q quit"
        }
    }
}
