//! Controller trait: the interface every view implements.
//!
//! - A controller owns its view's local state and renders itself.
//! - It reads settings and the session through [`Context`], never mutating them.
//! - It answers every message with `Vec<Action>`; the loop dispatches those.
//! - Messages a view does not care about are no-ops.

use jelly_proto::{Session, Settings};
use ratatui::text::Text;

use crate::command::Command;
use crate::message::{Message, ViewTag};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hand a command to the dispatcher.
    Run(Command),
    /// Feed a message back through the router within the same tick.
    Emit(Message),
}

/// Read-only app data a controller may consult.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub session: Option<&'a Session>,
}

pub trait Controller {
    fn id(&self) -> ViewTag;

    /// Called each time the view becomes active. Typically kicks off a fetch.
    fn init(&mut self, _ctx: &Context) -> Option<Command> {
        None
    }

    fn step(&mut self, msg: &Message, ctx: &Context) -> Vec<Action>;

    fn render(&self, theme: &Theme, ctx: &Context) -> Text<'static>;

    /// True while printable keys should be typed rather than treated as shortcuts.
    fn captures_text(&self) -> bool {
        false
    }

    /// Rendered line the view wants kept on screen.
    fn cursor_row(&self) -> Option<usize> {
        None
    }

    fn keys_hint(&self) -> &'static str;
}
