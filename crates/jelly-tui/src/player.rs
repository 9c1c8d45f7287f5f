//! External player. Playback runs mpv to completion on the command's task.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use jelly_proto::AppError;
use tracing::{info, warn};

#[async_trait]
pub trait Player: Send + Sync {
    /// Play `locator` and wait for the player to exit.
    async fn play(&self, locator: &str) -> Result<(), AppError>;
}

pub struct MpvPlayer {
    binary: PathBuf,
    stderr_log: Option<PathBuf>,
}

impl MpvPlayer {
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            stderr_log: None,
        }
    }

    /// Append mpv's stderr to `path` instead of discarding it.
    pub fn with_stderr_log(mut self, path: PathBuf) -> Self {
        self.stderr_log = Some(path);
        self
    }

    fn stderr(&self) -> Stdio {
        let Some(path) = &self.stderr_log else {
            return Stdio::null();
        };
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file.into(),
            Err(e) => {
                warn!("mpv: cannot open {:?}: {e}", path);
                Stdio::null()
            }
        }
    }
}

#[async_trait]
impl Player for MpvPlayer {
    async fn play(&self, locator: &str) -> Result<(), AppError> {
        let mut child = tokio::process::Command::new(&self.binary)
            .arg("--no-terminal")
            .arg("--force-window=yes")
            .arg(locator)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(self.stderr())
            .spawn()
            .map_err(|e| AppError::api(format!("failed to start {}: {e}", self.binary.display())))?;
        info!("mpv: spawned process with pid {:?}", child.id());

        let status = child
            .wait()
            .await
            .map_err(|e| AppError::api(format!("lost track of the player: {e}")))?;
        if status.success() {
            info!("mpv: exited normally");
            Ok(())
        } else {
            Err(AppError::api(format!("player exited with {status}")))
        }
    }
}
