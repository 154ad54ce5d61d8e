use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Delay before the computer answers, matching the classic half-second pause.
pub const DEFAULT_COMPUTER_DELAY_MS: u64 = 500;
pub const MAX_COMPUTER_DELAY_MS: u64 = 2000;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("settings file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub computer_delay_ms: u64,
    // Optional persisted window geometry (absent on first run)
    pub window_width: Option<i32>,
    pub window_height: Option<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            computer_delay_ms: DEFAULT_COMPUTER_DELAY_MS,
            window_width: None,
            window_height: None,
        }
    }
}

impl Settings {
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms.min(MAX_COMPUTER_DELAY_MS))
    }
}

fn project_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("io.github", "tictactoe", "TicTacToe").map(|p| p.config_dir().to_path_buf())
}

fn ensure_config_dir() -> io::Result<PathBuf> {
    if let Some(dir) = project_config_dir() {
        fs::create_dir_all(&dir)?;
        Ok(dir)
    } else {
        // Fallback to current directory
        Ok(std::env::current_dir()?)
    }
}

fn settings_path() -> io::Result<PathBuf> {
    let mut p = ensure_config_dir()?;
    p.push("settings.json");
    Ok(p)
}

/// Load settings from the platform config dir, falling back to defaults.
pub fn load_settings() -> Settings {
    match settings_path() {
        Ok(p) => load_settings_from(&p),
        Err(e) => {
            warn!("no config directory available: {}", e);
            Settings::default()
        }
    }
}

pub fn save_settings(s: &Settings) -> Result<(), StorageError> {
    save_settings_to(&settings_path()?, s)
}

pub fn load_settings_from(path: &Path) -> Settings {
    if !path.is_file() {
        return Settings::default();
    }
    match read_settings(path) {
        Ok(s) => {
            debug!(path = %path.display(), "settings loaded");
            s
        }
        Err(e) => {
            warn!(path = %path.display(), "ignoring settings file: {}", e);
            Settings::default()
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings, StorageError> {
    let mut data = String::new();
    File::open(path)?.read_to_string(&mut data)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn save_settings_to(path: &Path, s: &Settings) -> Result<(), StorageError> {
    let data = serde_json::to_string_pretty(s)?;
    let mut f = File::create(path)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
