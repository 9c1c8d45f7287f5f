//! Command: a deferred operation described as data.
//!
//! Controllers return these; the [`Dispatcher`](crate::dispatcher::Dispatcher)
//! executes them off the loop and turns each into at most one `Message`.

use std::fmt;

use jelly_proto::Settings;

/// A credential (password, tokenized URL) that never shows up in logs.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Authenticate {
        server_url: String,
        username: String,
        password: Secret,
    },
    /// `page` is 1-based.
    FetchPage {
        page: usize,
        per_page: usize,
        filter: String,
    },
    FetchItemDetail {
        item_id: String,
    },
    SearchCatalog {
        query: String,
    },
    FetchPlaylists,
    AttachItem {
        playlist_id: String,
        item_id: String,
    },
    CreatePlaylist {
        name: String,
    },
    /// Blocks its task until the player exits.
    PlayMedia {
        locator: Secret,
    },
    SaveSettings(Settings),
    /// Observed by the loop; never dispatched.
    Quit,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authenticate { .. } => "authenticate",
            Self::FetchPage { .. } => "fetch_page",
            Self::FetchItemDetail { .. } => "fetch_item_detail",
            Self::SearchCatalog { .. } => "search_catalog",
            Self::FetchPlaylists => "fetch_playlists",
            Self::AttachItem { .. } => "attach_item",
            Self::CreatePlaylist { .. } => "create_playlist",
            Self::PlayMedia { .. } => "play_media",
            Self::SaveSettings(_) => "save_settings",
            Self::Quit => "quit",
        }
    }
}
