use jelly_proto::MediaItem;
use ratatui::crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::command::Command;
use crate::controller::{Action, Context, Controller};
use crate::message::{Message, ViewTag};
use crate::theme::Theme;
use crate::widgets::list_cursor::ListCursor;
use crate::widgets::text_input::{InputAction, TextInput};

const HEADER_LINES: usize = 2;

pub struct SearchView {
    query: TextInput,
    /// Query of the last search sent, if any.
    searched: Option<String>,
    results: Vec<MediaItem>,
    cursor: ListCursor,
    searching: bool,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            query: TextInput::new("type to search"),
            searched: None,
            results: Vec::new(),
            cursor: ListCursor::default(),
            searching: false,
        }
    }
}

impl SearchView {
    pub fn results(&self) -> &[MediaItem] {
        &self.results
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    /// Enter searches when the query changed since the last search,
    /// otherwise it opens the highlighted result.
    fn confirm(&mut self) -> Vec<Action> {
        let query = self.query.value().trim().to_string();
        if !query.is_empty() && self.searched.as_deref() != Some(query.as_str()) {
            self.searched = Some(query.clone());
            self.searching = true;
            return vec![Action::Run(Command::SearchCatalog { query })];
        }
        match self.cursor.pick(&self.results) {
            Some(item) => vec![Action::Emit(Message::ShowDetail { item: item.clone() })],
            None => Vec::new(),
        }
    }
}

impl Controller for SearchView {
    fn id(&self) -> ViewTag {
        ViewTag::Search
    }

    fn step(&mut self, msg: &Message, _ctx: &Context) -> Vec<Action> {
        match msg {
            Message::SearchResultsLoaded { results } => {
                self.results = results.clone();
                self.searching = false;
                self.cursor.clamp(self.results.len());
                Vec::new()
            }
            Message::ErrorOccurred(_) => {
                // a failed search can be retried with the same query
                if self.searching {
                    self.searching = false;
                    self.searched = None;
                }
                Vec::new()
            }
            Message::Key(key) => match key.code {
                KeyCode::Up => {
                    self.cursor.up();
                    Vec::new()
                }
                KeyCode::Down => {
                    self.cursor.down(self.results.len());
                    Vec::new()
                }
                _ => match self.query.handle_key(*key) {
                    InputAction::Submitted(_) => self.confirm(),
                    InputAction::Cancelled => vec![Action::Emit(Message::ShowBrowse)],
                    InputAction::Changed | InputAction::Ignored => Vec::new(),
                },
            },
            _ => Vec::new(),
        }
    }

    fn render(&self, theme: &Theme, _ctx: &Context) -> Text<'static> {
        let mut prompt = vec![Span::styled("Search: ", theme.secondary())];
        prompt.extend(self.query.spans(theme, true));
        let mut lines = vec![Line::from(prompt), Line::default()];

        if self.searching {
            lines.push(Line::from(Span::styled("Searching…", theme.muted())));
        } else if self.results.is_empty() {
            let hint = if self.searched.is_some() {
                "No results found."
            } else {
                "Type a query and press Enter."
            };
            lines.push(Line::from(Span::styled(hint, theme.muted())));
        }
        for (i, item) in self.results.iter().enumerate() {
            let is_cursor = i == self.cursor.get();
            lines.push(Line::from(vec![
                Span::styled(if is_cursor { "› " } else { "  " }, theme.accent()),
                Span::styled(
                    item.label(),
                    if is_cursor { theme.selected() } else { theme.text() },
                ),
            ]));
        }
        Text::from(lines)
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn cursor_row(&self) -> Option<usize> {
        Some(HEADER_LINES + self.cursor.get())
    }

    fn keys_hint(&self) -> &'static str {
        "type query  Enter search/open  ↑↓ move  Esc back  F1 help  Ctrl+C quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jelly_proto::Settings;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    fn send(view: &mut SearchView, msg: Message) -> Vec<Action> {
        let settings = Settings::default();
        let ctx = Context {
            settings: &settings,
            session: None,
        };
        view.step(&msg, &ctx)
    }

    fn press(view: &mut SearchView, code: KeyCode) -> Vec<Action> {
        send(view, Message::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn hit(id: &str) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            name: format!("Hit {id}"),
            ..Default::default()
        }
    }

    fn rendered(view: &SearchView) -> String {
        let settings = Settings::default();
        let ctx = Context {
            settings: &settings,
            session: None,
        };
        format!("{:?}", view.render(&Theme::default(), &ctx))
    }

    #[test]
    fn empty_query_is_a_neutral_state() {
        let mut view = SearchView::default();
        assert!(press(&mut view, KeyCode::Enter).is_empty());
        assert!(rendered(&view).contains("Type a query"));
    }

    #[test]
    fn enter_searches_then_opens() {
        let mut view = SearchView::default();
        for c in "alien".chars() {
            assert!(press(&mut view, KeyCode::Char(c)).is_empty());
        }
        assert_eq!(
            press(&mut view, KeyCode::Enter),
            vec![Action::Run(Command::SearchCatalog {
                query: "alien".to_string()
            })]
        );

        send(
            &mut view,
            Message::SearchResultsLoaded {
                results: vec![hit("a"), hit("b")],
            },
        );
        press(&mut view, KeyCode::Down);
        match press(&mut view, KeyCode::Enter).as_slice() {
            [Action::Emit(Message::ShowDetail { item })] => assert_eq!(item.id, "b"),
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn editing_the_query_searches_again() {
        let mut view = SearchView::default();
        press(&mut view, KeyCode::Char('a'));
        press(&mut view, KeyCode::Enter);
        send(&mut view, Message::SearchResultsLoaded { results: vec![] });
        assert!(rendered(&view).contains("No results found."));

        press(&mut view, KeyCode::Char('b'));
        assert_eq!(
            press(&mut view, KeyCode::Enter),
            vec![Action::Run(Command::SearchCatalog {
                query: "ab".to_string()
            })]
        );
    }

    #[test]
    fn typed_q_is_part_of_the_query() {
        let mut view = SearchView::default();
        press(&mut view, KeyCode::Char('q'));
        assert_eq!(
            press(&mut view, KeyCode::Enter),
            vec![Action::Run(Command::SearchCatalog {
                query: "q".to_string()
            })]
        );
    }

    #[test]
    fn esc_returns_to_browse() {
        let mut view = SearchView::default();
        assert_eq!(
            press(&mut view, KeyCode::Esc),
            vec![Action::Emit(Message::ShowBrowse)]
        );
    }
}
