pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod platform;

pub use catalog::{stream_url, Catalog, MediaItem, Page, Playlist, Session};
pub use client::CatalogClient;
pub use config::Settings;
pub use error::{AppError, ErrorKind};
