//! Dispatcher: runs commands on their own tasks and feeds each result back
//! into the event loop as at most one message.
//!
//! Every failure becomes `Message::ErrorOccurred`, including a panic inside
//! the command, so the loop never sees an unhandled fault.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jelly_proto::{AppError, Catalog, Session};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::message::{AppEvent, Message};
use crate::player::Player;

pub struct Dispatcher<C, P> {
    catalog: Arc<C>,
    player: Arc<P>,
    settings_path: Arc<PathBuf>,
    tx: mpsc::Sender<AppEvent>,
}

impl<C, P> Dispatcher<C, P>
where
    C: Catalog + 'static,
    P: Player + 'static,
{
    pub fn new(catalog: C, player: P, settings_path: PathBuf, tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            player: Arc::new(player),
            settings_path: Arc::new(settings_path),
            tx,
        }
    }

    /// Spawn `command`. `session` is the session as of dispatch time.
    pub fn dispatch(&self, command: Command, session: Option<Session>) {
        let name = command.name();
        debug!("dispatch: {name}");
        let catalog = Arc::clone(&self.catalog);
        let player = Arc::clone(&self.player);
        let settings_path = Arc::clone(&self.settings_path);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let work = tokio::spawn(async move {
                execute(&*catalog, &*player, &settings_path, command, session).await
            });
            let message = match work.await {
                Ok(message) => message,
                Err(e) => {
                    error!("command {name} aborted: {e}");
                    Some(Message::ErrorOccurred(AppError::api(format!(
                        "{name} failed unexpectedly"
                    ))))
                }
            };
            if let Some(message) = message {
                if tx.send(AppEvent::Deliver(message)).await.is_err() {
                    debug!("command {name} finished after the event loop closed");
                }
            }
        });
    }
}

fn require(session: Option<&Session>) -> Result<&Session, AppError> {
    session.ok_or_else(|| AppError::authentication("not signed in"))
}

/// Run one command to completion and describe the outcome as a message.
pub async fn execute<C, P>(
    catalog: &C,
    player: &P,
    settings_path: &Path,
    command: Command,
    session: Option<Session>,
) -> Option<Message>
where
    C: Catalog + ?Sized,
    P: Player + ?Sized,
{
    let name = command.name();
    match run(catalog, player, settings_path, command, session.as_ref()).await {
        Ok(message) => message,
        Err(err) => {
            warn!("command {name} failed: {err}");
            Some(Message::ErrorOccurred(err))
        }
    }
}

async fn run<C, P>(
    catalog: &C,
    player: &P,
    settings_path: &Path,
    command: Command,
    session: Option<&Session>,
) -> Result<Option<Message>, AppError>
where
    C: Catalog + ?Sized,
    P: Player + ?Sized,
{
    let message = match command {
        Command::Authenticate {
            server_url,
            username,
            password,
        } => {
            let session = catalog
                .authenticate(&server_url, &username, password.expose())
                .await?;
            Message::Authenticated { session }
        }
        Command::FetchPage {
            page,
            per_page,
            filter,
        } => {
            let page = catalog
                .fetch_page(require(session)?, page, per_page, &filter)
                .await?;
            Message::MediaItemsLoaded {
                items: page.items,
                total_items: page.total,
            }
        }
        Command::FetchItemDetail { item_id } => {
            let item = catalog.item_details(require(session)?, &item_id).await?;
            Message::ItemDetailLoaded { item }
        }
        Command::SearchCatalog { query } => {
            let results = catalog.search(require(session)?, &query).await?;
            Message::SearchResultsLoaded { results }
        }
        Command::FetchPlaylists => {
            let playlists = catalog.fetch_playlists(require(session)?).await?;
            Message::PlaylistsLoaded { playlists }
        }
        Command::AttachItem {
            playlist_id,
            item_id,
        } => {
            catalog
                .attach_item(require(session)?, &playlist_id, &item_id)
                .await?;
            Message::PlaylistUpdateConfirmed {
                message: "Item added to playlist".to_string(),
            }
        }
        Command::CreatePlaylist { name } => {
            catalog.create_playlist(require(session)?, &name).await?;
            Message::PlaylistUpdateConfirmed {
                message: format!("Playlist \"{name}\" created"),
            }
        }
        Command::PlayMedia { locator } => {
            player.play(locator.expose()).await?;
            return Ok(None);
        }
        Command::SaveSettings(settings) => {
            settings.save_to(settings_path)?;
            info!("settings saved to {}", settings_path.display());
            return Ok(None);
        }
        Command::Quit => return Ok(None),
    };
    Ok(Some(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use jelly_proto::{ErrorKind, MediaItem, Page, Playlist, Settings};

    use crate::command::Secret;

    #[derive(Default)]
    struct FakeCatalog {
        fail_attach: bool,
        attached: Mutex<Vec<(String, String)>>,
    }

    fn session() -> Session {
        Session {
            base_url: "http://media.local".to_string(),
            user_id: "u1".to_string(),
            user_name: "alice".to_string(),
            token: "abc".to_string(),
        }
    }

    fn item(i: usize) -> MediaItem {
        MediaItem {
            id: format!("item{i}"),
            name: format!("Movie {i}"),
            ..Default::default()
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn authenticate(
            &self,
            _server_url: &str,
            username: &str,
            password: &str,
        ) -> Result<Session, AppError> {
            if password == "secret" {
                Ok(Session {
                    user_name: username.to_string(),
                    ..session()
                })
            } else {
                Err(AppError::authentication("invalid username or password"))
            }
        }

        async fn fetch_page(
            &self,
            _session: &Session,
            page: usize,
            page_size: usize,
            _filter: &str,
        ) -> Result<Page, AppError> {
            let start = (page - 1) * page_size;
            Ok(Page {
                items: (start..45).take(page_size).map(item).collect(),
                total: 45,
            })
        }

        async fn item_details(&self, _s: &Session, item_id: &str) -> Result<MediaItem, AppError> {
            Ok(MediaItem {
                id: item_id.to_string(),
                ..Default::default()
            })
        }

        async fn search(&self, _s: &Session, _query: &str) -> Result<Vec<MediaItem>, AppError> {
            Ok(vec![item(1)])
        }

        async fn fetch_playlists(&self, _s: &Session) -> Result<Vec<Playlist>, AppError> {
            Ok(vec![Playlist {
                id: "p1".to_string(),
                name: "Favourites".to_string(),
            }])
        }

        async fn attach_item(
            &self,
            _s: &Session,
            playlist_id: &str,
            item_id: &str,
        ) -> Result<(), AppError> {
            if self.fail_attach {
                return Err(AppError::network("connection reset"));
            }
            self.attached
                .lock()
                .unwrap()
                .push((playlist_id.to_string(), item_id.to_string()));
            Ok(())
        }

        async fn create_playlist(&self, _s: &Session, _name: &str) -> Result<(), AppError> {
            Ok(())
        }
    }

    struct FakePlayer {
        exit_ok: bool,
    }

    #[async_trait]
    impl Player for FakePlayer {
        async fn play(&self, locator: &str) -> Result<(), AppError> {
            if locator == "panic" {
                panic!("player blew up");
            }
            if self.exit_ok {
                Ok(())
            } else {
                Err(AppError::api("player exited with exit status: 1"))
            }
        }
    }

    async fn exec(catalog: &FakeCatalog, command: Command, session: Option<Session>) -> Option<Message> {
        let player = FakePlayer { exit_ok: true };
        let dir = tempfile::tempdir().unwrap();
        execute(catalog, &player, &dir.path().join("config.toml"), command, session).await
    }

    #[tokio::test]
    async fn authenticate_yields_session() {
        let catalog = FakeCatalog::default();
        let msg = exec(
            &catalog,
            Command::Authenticate {
                server_url: "http://media.local".to_string(),
                username: "alice".to_string(),
                password: Secret::new("secret"),
            },
            None,
        )
        .await;
        match msg {
            Some(Message::Authenticated { session }) => assert_eq!(session.token, "abc"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_password_becomes_error_message() {
        let catalog = FakeCatalog::default();
        let msg = exec(
            &catalog,
            Command::Authenticate {
                server_url: "http://media.local".to_string(),
                username: "alice".to_string(),
                password: Secret::new("nope"),
            },
            None,
        )
        .await;
        match msg {
            Some(Message::ErrorOccurred(err)) => assert_eq!(err.kind, ErrorKind::Authentication),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn catalog_commands_need_a_session() {
        let catalog = FakeCatalog::default();
        let msg = exec(&catalog, Command::FetchPlaylists, None).await;
        match msg {
            Some(Message::ErrorOccurred(err)) => {
                assert_eq!(err.kind, ErrorKind::Authentication);
                assert_eq!(err.message, "not signed in");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_page_reports_total() {
        let catalog = FakeCatalog::default();
        let msg = exec(
            &catalog,
            Command::FetchPage {
                page: 3,
                per_page: 20,
                filter: String::new(),
            },
            Some(session()),
        )
        .await;
        match msg {
            Some(Message::MediaItemsLoaded { items, total_items }) => {
                assert_eq!(items.len(), 5);
                assert_eq!(total_items, 45);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn attach_confirms_or_reports_network_error() {
        let catalog = FakeCatalog::default();
        let attach = Command::AttachItem {
            playlist_id: "p1".to_string(),
            item_id: "item3".to_string(),
        };
        let msg = exec(&catalog, attach.clone(), Some(session())).await;
        assert_eq!(
            msg,
            Some(Message::PlaylistUpdateConfirmed {
                message: "Item added to playlist".to_string()
            })
        );
        assert_eq!(catalog.attached.lock().unwrap().len(), 1);

        let failing = FakeCatalog {
            fail_attach: true,
            ..Default::default()
        };
        match exec(&failing, attach, Some(session())).await {
            Some(Message::ErrorOccurred(err)) => assert_eq!(err.kind, ErrorKind::Network),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn play_yields_nothing_on_success_and_error_on_failure() {
        let catalog = FakeCatalog::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let play = Command::PlayMedia {
            locator: Secret::new("http://media.local/Videos/1/stream"),
        };

        let ok = FakePlayer { exit_ok: true };
        assert_eq!(execute(&catalog, &ok, &path, play.clone(), None).await, None);

        let failing = FakePlayer { exit_ok: false };
        match execute(&catalog, &failing, &path, play, None).await {
            Some(Message::ErrorOccurred(err)) => assert_eq!(err.kind, ErrorKind::Api),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_settings_writes_file_silently() {
        let catalog = FakeCatalog::default();
        let player = FakePlayer { exit_ok: true };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jelly").join("config.toml");
        let settings = Settings {
            items_per_page: 50,
            ..Settings::default()
        };

        let msg = execute(
            &catalog,
            &player,
            &path,
            Command::SaveSettings(settings.clone()),
            None,
        )
        .await;
        assert_eq!(msg, None);
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[tokio::test]
    async fn dispatch_delivers_result_on_the_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = Dispatcher::new(
            FakeCatalog::default(),
            FakePlayer { exit_ok: true },
            dir.path().join("config.toml"),
            tx,
        );

        dispatcher.dispatch(Command::SearchCatalog { query: "x".to_string() }, Some(session()));
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            AppEvent::Deliver(Message::SearchResultsLoaded { results }) => {
                assert_eq!(results.len(), 1)
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicking_command_becomes_error_message() {
        let (tx, mut rx) = mpsc::channel(8);
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = Dispatcher::new(
            FakeCatalog::default(),
            FakePlayer { exit_ok: true },
            dir.path().join("config.toml"),
            tx,
        );

        dispatcher.dispatch(
            Command::PlayMedia {
                locator: Secret::new("panic"),
            },
            None,
        );
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            AppEvent::Deliver(Message::ErrorOccurred(err)) => {
                assert_eq!(err.kind, ErrorKind::Api);
                assert!(err.message.contains("play_media"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
