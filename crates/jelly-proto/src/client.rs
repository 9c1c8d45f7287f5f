//! `CatalogClient`: reqwest implementation of [`Catalog`] against a
//! Jellyfin-compatible server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::catalog::{Catalog, MediaItem, Page, Playlist, Session};
use crate::error::AppError;

const CLIENT_NAME: &str = "jelly";
const DEVICE_NAME: &str = "terminal";
const DEVICE_ID: &str = "jelly-tui";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthUser {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    total_record_count: usize,
}

#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
}

impl CatalogClient {
    pub fn new() -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(concat!("jelly/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    fn authorization(token: Option<&str>) -> String {
        let mut header = format!(
            "MediaBrowser Client=\"{CLIENT_NAME}\", Device=\"{DEVICE_NAME}\", DeviceId=\"{DEVICE_ID}\", Version=\"{}\"",
            env!("CARGO_PKG_VERSION")
        );
        if let Some(token) = token {
            header.push_str(&format!(", Token=\"{token}\""));
        }
        header
    }

    fn get(&self, session: &Session, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{path}", session.base_url))
            .header("X-Emby-Authorization", Self::authorization(Some(&session.token)))
    }

    fn post(&self, session: &Session, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{path}", session.base_url))
            .header("X-Emby-Authorization", Self::authorization(Some(&session.token)))
    }

    async fn items<T: DeserializeOwned>(
        &self,
        session: &Session,
        query: &[(&str, String)],
    ) -> Result<ItemsResponse<T>, AppError> {
        let resp = self
            .get(session, "/Items")
            .query(&[("UserId", session.user_id.as_str()), ("Recursive", "true")])
            .query(query)
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }
}

fn base_url(server_url: &str) -> String {
    server_url.trim().trim_end_matches('/').to_string()
}

async fn check_status(resp: Response) -> Result<Response, AppError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        Err(AppError::api(format!("server returned {status}")))
    } else {
        let snippet: String = body.chars().take(200).collect();
        Err(AppError::api(format!("server returned {status}: {snippet}")))
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn authenticate(
        &self,
        server_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        if username.trim().is_empty() {
            return Err(AppError::input("username is required"));
        }
        let base = base_url(server_url);
        debug!("authenticating {username} against {base}");

        let resp = self
            .http
            .post(format!("{base}/Users/AuthenticateByName"))
            .header("X-Emby-Authorization", Self::authorization(None))
            .json(&json!({ "Username": username, "Pw": password }))
            .send()
            .await?;
        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AppError::authentication("invalid username or password"));
        }
        let auth: AuthResponse = check_status(resp).await?.json().await?;
        if auth.access_token.is_empty() {
            return Err(AppError::authentication("server returned an empty access token"));
        }

        info!("authenticated as {} ({})", auth.user.name, auth.user.id);
        Ok(Session {
            base_url: base,
            user_id: auth.user.id,
            user_name: auth.user.name,
            token: auth.access_token,
        })
    }

    async fn fetch_page(
        &self,
        session: &Session,
        page: usize,
        page_size: usize,
        filter: &str,
    ) -> Result<Page, AppError> {
        let start = page.saturating_sub(1) * page_size;
        let mut query = vec![
            ("StartIndex", start.to_string()),
            ("Limit", page_size.to_string()),
            ("SortBy", "SortName".to_string()),
        ];
        if !filter.is_empty() {
            query.push(("IncludeItemTypes", filter.to_string()));
        }
        let resp: ItemsResponse<MediaItem> = self.items(session, &query).await?;
        Ok(Page {
            items: resp.items,
            total: resp.total_record_count,
        })
    }

    async fn item_details(&self, session: &Session, item_id: &str) -> Result<MediaItem, AppError> {
        let resp = self
            .get(session, &format!("/Items/{item_id}"))
            .query(&[("UserId", session.user_id.as_str())])
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }

    async fn search(&self, session: &Session, query: &str) -> Result<Vec<MediaItem>, AppError> {
        let resp: ItemsResponse<MediaItem> = self
            .items(session, &[("SearchTerm", query.to_string())])
            .await?;
        Ok(resp.items)
    }

    async fn fetch_playlists(&self, session: &Session) -> Result<Vec<Playlist>, AppError> {
        let resp: ItemsResponse<Playlist> = self
            .items(session, &[("IncludeItemTypes", "Playlist".to_string())])
            .await?;
        Ok(resp.items)
    }

    async fn attach_item(
        &self,
        session: &Session,
        playlist_id: &str,
        item_id: &str,
    ) -> Result<(), AppError> {
        let resp = self
            .post(session, &format!("/Playlists/{playlist_id}/Items"))
            .query(&[("Ids", item_id), ("UserId", session.user_id.as_str())])
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn create_playlist(&self, session: &Session, name: &str) -> Result<(), AppError> {
        let resp = self
            .post(session, "/Playlists")
            .json(&json!({ "Name": name, "MediaType": "Video", "UserId": session.user_id }))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}
