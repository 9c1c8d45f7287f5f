//! Router: decides, per message, whether the app handles it globally,
//! whether it switches views, or whether it goes to the active controller.

use jelly_proto::{AppError, Session};

use crate::message::{Message, SettingField, ViewTag};

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Quit,
    Error(AppError),
    Authenticated(Session),
    SettingsUpdated { field: SettingField, value: String },
    Navigate(ViewTag),
    Forward,
}

pub fn classify(msg: &Message) -> Route {
    match msg {
        Message::Quit => Route::Quit,
        Message::ErrorOccurred(err) => Route::Error(err.clone()),
        Message::Authenticated { session } => Route::Authenticated(session.clone()),
        Message::SettingsUpdated { field, value } => Route::SettingsUpdated {
            field: *field,
            value: value.clone(),
        },
        other => match next_view(other) {
            Some(tag) => Route::Navigate(tag),
            None => Route::Forward,
        },
    }
}

/// The navigation table. The target never depends on the view being left.
pub fn next_view(msg: &Message) -> Option<ViewTag> {
    let tag = match msg {
        Message::ShowLogin => ViewTag::Login,
        Message::ShowBrowse => ViewTag::Browse,
        Message::ShowDetail { .. } => ViewTag::Detail,
        Message::ShowSearch => ViewTag::Search,
        Message::ShowPlaylist | Message::ShowCreatePlaylist | Message::AddToPlaylist { .. } => {
            ViewTag::Playlist
        }
        Message::ShowSettings => ViewTag::Settings,
        Message::ShowEditSetting { .. } => ViewTag::EditSetting,
        Message::ShowHelp => ViewTag::Help,
        _ => return None,
    };
    Some(tag)
}
