//! Catalog domain types and the [`Catalog`] seam.
//!
//! The TUI never talks HTTP directly: command execution goes through this
//! trait so it can run against [`crate::CatalogClient`] in production and an
//! in-memory fake in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One entry of the media catalog, decoded from the server's PascalCase JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub item_type: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub community_rating: Option<f64>,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default)]
    pub run_time_ticks: Option<i64>,
}

const TICKS_PER_MINUTE: i64 = 600_000_000;

impl MediaItem {
    /// `Name (Type)`, as shown in result lists.
    pub fn label(&self) -> String {
        if self.item_type.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.item_type)
        }
    }

    pub fn runtime_minutes(&self) -> Option<i64> {
        self.run_time_ticks
            .filter(|t| *t > 0)
            .map(|t| (t + TICKS_PER_MINUTE - 1) / TICKS_PER_MINUTE)
    }

    /// Community rating, only when the server reports a positive value.
    pub fn rating(&self) -> Option<f64> {
        self.community_rating.filter(|r| *r > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// One page of browse results plus the server-side total.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub items: Vec<MediaItem>,
    pub total: usize,
}

/// An authenticated catalog session. Written once on login.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Server URL captured at login, without a trailing slash.
    pub base_url: String,
    pub user_id: String,
    pub user_name: String,
    pub token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn authenticate(
        &self,
        server_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, AppError>;

    /// `page` is 1-based.
    async fn fetch_page(
        &self,
        session: &Session,
        page: usize,
        page_size: usize,
        filter: &str,
    ) -> Result<Page, AppError>;

    async fn item_details(&self, session: &Session, item_id: &str) -> Result<MediaItem, AppError>;

    async fn search(&self, session: &Session, query: &str) -> Result<Vec<MediaItem>, AppError>;

    async fn fetch_playlists(&self, session: &Session) -> Result<Vec<Playlist>, AppError>;

    async fn attach_item(
        &self,
        session: &Session,
        playlist_id: &str,
        item_id: &str,
    ) -> Result<(), AppError>;

    async fn create_playlist(&self, session: &Session, name: &str) -> Result<(), AppError>;
}

/// Direct-play locator handed to the external player.
pub fn stream_url(session: &Session, item_id: &str) -> String {
    format!(
        "{}/Videos/{}/stream?static=true&api_key={}",
        session.base_url, item_id, session.token
    )
}
