mod app;
mod app_state;
mod command;
mod controller;
mod dispatcher;
mod input;
mod message;
mod player;
mod router;
mod theme;
mod views;
mod widgets;

use jelly_proto::{platform, CatalogClient, Settings};

use crate::app::App;
use crate::app_state::AppState;
use crate::player::MpvPlayer;
use crate::theme::Theme;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Playback needs mpv; refuse to start without it.
    let Some(mpv) = platform::find_mpv_binary() else {
        eprintln!(
            "jelly: {} is not installed or not in PATH. Install mpv and try again.",
            platform::mpv_binary_name()
        );
        std::process::exit(1);
    };

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("tui.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG overrides; HTTP client internals stay at warn.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("jelly log: {}", log_path.display());
    tracing::info!("jelly starting… (mpv at {})", mpv.display());

    // ── Load settings ────────────────────────────────────────────────────────
    let settings = Settings::load();
    tracing::info!(
        "settings: server={} per_page={}",
        settings.server_url,
        settings.items_per_page
    );

    // ── Collaborators ────────────────────────────────────────────────────────
    let catalog = CatalogClient::new()?;
    let player = MpvPlayer::new(mpv).with_stderr_log(data_dir.join("mpv-stderr.log"));

    let app = App::new(AppState::new(settings), Theme::default());
    let result = app.run(catalog, player, Settings::config_path()).await;
    if let Err(e) = &result {
        tracing::error!("fatal: {e:#}");
    }
    tracing::info!("jelly exiting");
    result
}
