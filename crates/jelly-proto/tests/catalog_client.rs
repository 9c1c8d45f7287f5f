//! Runs `CatalogClient` against an in-process fake server.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use jelly_proto::{Catalog, CatalogClient, ErrorKind, Session};

const TOKEN: &str = "abc";
const TOTAL_ITEMS: usize = 45;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("X-Emby-Authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(&format!("Token=\"{TOKEN}\"")))
        .unwrap_or(false)
}

fn item(i: usize) -> Value {
    json!({
        "Id": format!("item{i}"),
        "Name": format!("Movie {i}"),
        "Type": "Movie",
        "CommunityRating": 7.5,
    })
}

async fn authenticate(Json(body): Json<Value>) -> impl IntoResponse {
    if body["Username"] == "alice" && body["Pw"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({ "AccessToken": TOKEN, "User": { "Id": "u1", "Name": "alice" } })),
        )
            .into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn items(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if let Some(term) = q.get("SearchTerm") {
        let hits: Vec<Value> = (0..TOTAL_ITEMS)
            .filter(|i| format!("Movie {i}").ends_with(term.as_str()))
            .map(item)
            .collect();
        let total = hits.len();
        return Json(json!({ "Items": hits, "TotalRecordCount": total })).into_response();
    }
    match q.get("IncludeItemTypes").map(String::as_str) {
        Some("Playlist") => {
            return Json(json!({
                "Items": [{ "Id": "p1", "Name": "Favourites" }, { "Id": "p2", "Name": "Later" }],
                "TotalRecordCount": 2,
            }))
            .into_response();
        }
        Some("Series") => {
            return Json(json!({ "Items": [], "TotalRecordCount": 0 })).into_response();
        }
        _ => {}
    }
    let start: usize = q.get("StartIndex").and_then(|s| s.parse().ok()).unwrap_or(0);
    let limit: usize = q.get("Limit").and_then(|s| s.parse().ok()).unwrap_or(TOTAL_ITEMS);
    let page: Vec<Value> = (start..TOTAL_ITEMS).take(limit).map(item).collect();
    Json(json!({ "Items": page, "TotalRecordCount": TOTAL_ITEMS })).into_response()
}

async fn item_detail(Path(id): Path<String>) -> impl IntoResponse {
    match id.strip_prefix("item").and_then(|n| n.parse::<usize>().ok()) {
        Some(n) if n < TOTAL_ITEMS => Json(item(n)).into_response(),
        _ => (StatusCode::NOT_FOUND, "no such item").into_response(),
    }
}

async fn attach(Path(id): Path<String>, Query(q): Query<HashMap<String, String>>) -> StatusCode {
    if id == "p1" && q.get("Ids").is_some() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn create_playlist(Json(body): Json<Value>) -> impl IntoResponse {
    if body["MediaType"] == "Video" && body["Name"].as_str().is_some() {
        Json(json!({ "Id": "p3" })).into_response()
    } else {
        StatusCode::BAD_REQUEST.into_response()
    }
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/Users/AuthenticateByName", post(authenticate))
        .route("/Items", get(items))
        .route("/Items/:id", get(item_detail))
        .route("/Playlists", post(create_playlist))
        .route("/Playlists/:id/Items", post(attach));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn signed_in() -> (CatalogClient, Session) {
    let addr = spawn_server().await;
    let client = CatalogClient::new().unwrap();
    let session = client
        .authenticate(&format!("http://{addr}/"), "alice", "secret")
        .await
        .unwrap();
    (client, session)
}

#[tokio::test]
async fn login_returns_session_with_token() {
    let (_, session) = signed_in().await;
    assert_eq!(session.token, TOKEN);
    assert_eq!(session.user_id, "u1");
    assert!(!session.base_url.ends_with('/'));
}

#[tokio::test]
async fn wrong_password_is_an_authentication_error() {
    let addr = spawn_server().await;
    let client = CatalogClient::new().unwrap();
    let err = client
        .authenticate(&format!("http://{addr}"), "alice", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CatalogClient::new().unwrap();
    let err = client
        .authenticate(&format!("http://{addr}"), "alice", "secret")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}

#[tokio::test]
async fn pages_are_offset_by_page_size() {
    let (client, session) = signed_in().await;

    let first = client.fetch_page(&session, 1, 20, "").await.unwrap();
    assert_eq!(first.total, 45);
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.items[0].id, "item0");

    let last = client.fetch_page(&session, 3, 20, "").await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert_eq!(last.items[0].id, "item40");
}

#[tokio::test]
async fn filter_is_sent_as_item_type() {
    let (client, session) = signed_in().await;
    let page = client.fetch_page(&session, 1, 20, "Series").await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn search_and_details() {
    let (client, session) = signed_in().await;

    let hits = client.search(&session, "42").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].label(), "Movie 42 (Movie)");

    let detail = client.item_details(&session, "item7").await.unwrap();
    assert_eq!(detail.name, "Movie 7");
    assert_eq!(detail.rating(), Some(7.5));

    let err = client.item_details(&session, "item99").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Api);
    assert!(err.message.contains("404"));
}

#[tokio::test]
async fn playlist_operations() {
    let (client, session) = signed_in().await;

    let playlists = client.fetch_playlists(&session).await.unwrap();
    assert_eq!(playlists.len(), 2);
    assert_eq!(playlists[0].name, "Favourites");

    client.attach_item(&session, "p1", "item3").await.unwrap();
    let err = client.attach_item(&session, "p2", "item3").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Api);

    client.create_playlist(&session, "Weekend").await.unwrap();
}

#[tokio::test]
async fn bad_token_is_rejected_by_server() {
    let (client, mut session) = signed_in().await;
    session.token = "stale".to_string();
    let err = client.fetch_playlists(&session).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Api);
}
