//! App: the event loop.
//!
//! Architecture:
//! - `App` owns `AppState`; nothing else writes to it.
//! - A `tokio::mpsc` channel carries `AppEvent`s in from the terminal reader
//!   and from finished commands, one ordered stream.
//! - `step` integrates one event and returns the commands it produced. It
//!   performs no I/O.
//! - `run` draws, awaits the next event, steps, and hands commands to the
//!   `Dispatcher` until a `Quit` command comes back.

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use jelly_proto::{AppError, Catalog};
use ratatui::crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::command::Command;
use crate::controller::Action;
use crate::dispatcher::Dispatcher;
use crate::input;
use crate::message::{AppEvent, Message, ViewTag};
use crate::player::Player;
use crate::router::{self, Route};
use crate::theme::Theme;
use crate::views::EditSettingView;
use crate::widgets::pane_chrome::{pane_chrome, Badge};
use crate::widgets::status_bar::{draw_header, draw_keys_bar, InputMode};

const INPUT_POLL: Duration = Duration::from_millis(250);

pub struct App {
    pub state: AppState,
    theme: Theme,
    should_quit: bool,
}

impl App {
    pub fn new(state: AppState, theme: Theme) -> Self {
        Self {
            state,
            theme,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run<C, P>(mut self, catalog: C, player: P, settings_path: PathBuf) -> anyhow::Result<()>
    where
        C: Catalog + 'static,
        P: Player + 'static,
    {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppEvent>(1024);
        let dispatcher = Dispatcher::new(catalog, player, settings_path, tx.clone());

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx;
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(_) => break,
            }
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppEvent::Terminal(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        let result = self.event_loop(&mut terminal, &mut rx, &dispatcher).await;
        rx.close();

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("event loop finished");
        result
    }

    async fn event_loop<C, P>(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        rx: &mut mpsc::Receiver<AppEvent>,
        dispatcher: &Dispatcher<C, P>,
    ) -> anyhow::Result<()>
    where
        C: Catalog + 'static,
        P: Player + 'static,
    {
        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            let Some(event) = rx.recv().await else {
                break;
            };
            for command in self.step(event) {
                if command == Command::Quit {
                    info!("quit requested");
                    self.should_quit = true;
                    break;
                }
                dispatcher.dispatch(command, self.state.session.clone());
            }
        }
        Ok(())
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Integrate one event. Messages emitted by controllers are processed
    /// within the same call, in order, before it returns.
    pub fn step(&mut self, event: AppEvent) -> Vec<Command> {
        let msg = match event {
            AppEvent::Terminal(Event::Key(key)) => match self.translate_key(key) {
                Some(msg) => msg,
                None => return Vec::new(),
            },
            AppEvent::Terminal(_) => return Vec::new(),
            AppEvent::Deliver(msg) => msg,
        };

        let mut commands = Vec::new();
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            self.process(msg, &mut queue, &mut commands);
        }
        commands
    }

    fn translate_key(&mut self, key: KeyEvent) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if let Some(err) = &self.state.last_error {
            if input::is_interrupt(&key) {
                return Some(Message::Quit);
            }
            debug!("dismissed error: {err}");
            self.state.last_error = None;
            return None;
        }
        let captures = self
            .state
            .active()
            .is_some_and(|controller| controller.captures_text());
        input::translate(key, captures)
    }

    fn process(&mut self, msg: Message, queue: &mut VecDeque<Message>, commands: &mut Vec<Command>) {
        match router::classify(&msg) {
            Route::Quit => commands.push(Command::Quit),
            Route::Error(err) => {
                warn!("error shown: {err}");
                self.state.last_error = Some(err);
                // lets the view drop its pending-request state
                self.deliver(self.state.active_view, &msg, queue, commands);
            }
            Route::Authenticated(session) => {
                if self.state.session.is_some() {
                    debug!("ignoring repeated sign-in as {}", session.user_name);
                    return;
                }
                info!("signed in as {} at {}", session.user_name, session.base_url);
                self.state.session = Some(session);
                queue.push_back(Message::ShowBrowse);
            }
            Route::SettingsUpdated { field, value } => {
                match field.apply(&mut self.state.settings, &value) {
                    Ok(()) => {
                        info!("setting {} updated", field.label());
                        commands.push(Command::SaveSettings(self.state.settings.clone()));
                    }
                    Err(err) => queue.push_back(Message::ErrorOccurred(err)),
                }
            }
            Route::Navigate(target) => self.navigate(target, &msg, queue, commands),
            Route::Forward => self.deliver(self.state.active_view, &msg, queue, commands),
        }
    }

    fn navigate(
        &mut self,
        target: ViewTag,
        msg: &Message,
        queue: &mut VecDeque<Message>,
        commands: &mut Vec<Command>,
    ) {
        let from = self.state.active_view;
        debug!("navigate: {:?} -> {:?}", from, target);

        if target != ViewTag::EditSetting {
            self.state.views.edit_setting = None;
        }
        if let Message::ShowEditSetting { field } = msg {
            let current = field.current(&self.state.settings);
            self.state.views.edit_setting = Some(EditSettingView::new(*field, &current));
        }
        self.state.active_view = target;

        self.deliver(target, msg, queue, commands);
        let (views, ctx) = self.state.split();
        if let Some(command) = views.get_mut(target).and_then(|c| c.init(&ctx)) {
            commands.push(command);
        }
    }

    fn deliver(
        &mut self,
        tag: ViewTag,
        msg: &Message,
        queue: &mut VecDeque<Message>,
        commands: &mut Vec<Command>,
    ) {
        let (views, ctx) = self.state.split();
        let Some(controller) = views.get_mut(tag) else {
            return;
        };
        debug_assert_eq!(controller.id(), tag);
        for action in controller.step(msg, &ctx) {
            match action {
                Action::Run(command) => commands.push(command),
                Action::Emit(message) => queue.push_back(message),
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let who = self
            .state
            .session
            .as_ref()
            .map(|s| format!("{} @ {}", s.user_name, s.base_url));
        draw_header(
            frame,
            chunks[0],
            self.state.active_view.title(),
            who.as_deref(),
            &self.theme,
        );

        match &self.state.last_error {
            Some(err) => self.draw_error(frame, chunks[1], err),
            None => self.draw_body(frame, chunks[1]),
        }

        let (mode, keys) = match (&self.state.last_error, self.state.active()) {
            (Some(_), _) => (InputMode::Normal, "any key dismiss  Ctrl+C quit"),
            (None, Some(c)) if c.captures_text() => (InputMode::Input, c.keys_hint()),
            (None, Some(c)) => (InputMode::Normal, c.keys_hint()),
            (None, None) => (InputMode::Normal, "q quit"),
        };
        draw_keys_bar(frame, chunks[2], mode, keys, &self.theme);
    }

    fn draw_body(&self, frame: &mut Frame, area: Rect) {
        let block = pane_chrome(self.state.active_view.title(), true, None, &self.theme);
        let Some(controller) = self.state.active() else {
            frame.render_widget(block, area);
            return;
        };
        let text = controller.render(&self.theme, &self.state.context());

        // keep the cursor row inside the pane
        let inner_height = area.height.saturating_sub(2) as usize;
        let scroll = controller
            .cursor_row()
            .map(|row| row.saturating_sub(inner_height.saturating_sub(1)))
            .unwrap_or(0);
        let paragraph = Paragraph::new(text)
            .block(block)
            .scroll((scroll.min(u16::MAX as usize) as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_error(&self, frame: &mut Frame, area: Rect, err: &AppError) {
        let block = pane_chrome(
            err.kind.label(),
            true,
            Some(Badge {
                text: "ERR",
                color: self.theme.error,
            }),
            &self.theme,
        );
        let text = Text::from(vec![
            Line::from(Span::styled(err.to_string(), self.theme.error())),
            Line::default(),
            Line::from(Span::styled(
                "Press any key to continue.",
                self.theme.muted(),
            )),
        ]);
        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}
