use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::AppError;
use super::platform;

/// User settings persisted as `config.toml` in the platform config dir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Username prefilled on the login screen.
    #[serde(default)]
    pub default_user: String,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

fn default_server_url() -> String {
    "http://localhost:8096".to_string()
}

fn default_items_per_page() -> usize {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            default_user: String::new(),
            items_per_page: default_items_per_page(),
        }
    }
}

impl Settings {
    /// Load from the default location. Never fails: unreadable or malformed
    /// files fall back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("could not read {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };

        let mut settings: Self = match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("could not parse {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        if settings.items_per_page == 0 {
            warn!("items_per_page = 0 in {}, using default", path.display());
            settings.items_per_page = default_items_per_page();
        }
        settings
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
