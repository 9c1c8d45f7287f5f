//! Message: every event the loop integrates, from input or from a finished command.

use jelly_proto::{AppError, MediaItem, Playlist, Session, Settings};
use ratatui::crossterm::event::{Event, KeyEvent};

/// The interactive screens. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewTag {
    #[default]
    Login,
    Browse,
    Detail,
    Search,
    Playlist,
    Settings,
    EditSetting,
    Help,
}

impl ViewTag {
    pub const ALL: [ViewTag; 8] = [
        Self::Login,
        Self::Browse,
        Self::Detail,
        Self::Search,
        Self::Playlist,
        Self::Settings,
        Self::EditSetting,
        Self::Help,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Browse => "Browse",
            Self::Detail => "Details",
            Self::Search => "Search",
            Self::Playlist => "Playlists",
            Self::Settings => "Settings",
            Self::EditSetting => "Edit setting",
            Self::Help => "Help",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    ServerUrl,
    DefaultUser,
    ItemsPerPage,
}

impl SettingField {
    pub const ALL: [SettingField; 3] = [Self::ServerUrl, Self::DefaultUser, Self::ItemsPerPage];

    pub fn label(self) -> &'static str {
        match self {
            Self::ServerUrl => "Server URL",
            Self::DefaultUser => "Default User",
            Self::ItemsPerPage => "Items Per Page",
        }
    }

    pub fn current(self, settings: &Settings) -> String {
        match self {
            Self::ServerUrl => settings.server_url.clone(),
            Self::DefaultUser => settings.default_user.clone(),
            Self::ItemsPerPage => settings.items_per_page.to_string(),
        }
    }

    /// Validate `value` and write it into `settings`. On error `settings` is untouched.
    pub fn apply(self, settings: &mut Settings, value: &str) -> Result<(), AppError> {
        let value = value.trim();
        match self {
            Self::ServerUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(AppError::input(
                        "server URL must start with http:// or https://",
                    ));
                }
                settings.server_url = value.trim_end_matches('/').to_string();
            }
            Self::DefaultUser => settings.default_user = value.to_string(),
            Self::ItemsPerPage => match value.parse::<usize>() {
                Ok(n) if n > 0 => settings.items_per_page = n,
                _ => {
                    return Err(AppError::input(format!(
                        "items per page must be a positive number, got {value:?}"
                    )))
                }
            },
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press, forwarded to the active controller.
    Key(KeyEvent),

    // ── Navigation ──
    ShowLogin,
    ShowBrowse,
    ShowDetail { item: MediaItem },
    ShowSearch,
    ShowPlaylist,
    ShowSettings,
    ShowEditSetting { field: SettingField },
    ShowCreatePlaylist,
    ShowHelp,
    AddToPlaylist { item_id: String },
    Quit,

    // ── Data results ──
    Authenticated { session: Session },
    MediaItemsLoaded { items: Vec<MediaItem>, total_items: usize },
    SearchResultsLoaded { results: Vec<MediaItem> },
    PlaylistsLoaded { playlists: Vec<Playlist> },
    ItemDetailLoaded { item: MediaItem },
    SettingsUpdated { field: SettingField, value: String },
    PlaylistUpdateConfirmed { message: String },

    // ── Faults ──
    ErrorOccurred(AppError),
}

impl From<AppError> for Message {
    fn from(err: AppError) -> Self {
        Self::ErrorOccurred(err)
    }
}

/// What arrives on the loop's queue: raw terminal input or a command result.
#[derive(Debug)]
pub enum AppEvent {
    Terminal(Event),
    Deliver(Message),
}
