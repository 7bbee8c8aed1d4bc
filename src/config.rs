use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::TimerError;

/// Environment variable overriding the sound command.
pub const SOUND_CMD_ENV: &str = "TIMER_SOUND_CMD";

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_sound_command")]
    pub sound_command: String,

    #[serde(default = "default_notification_title")]
    pub notification_title: String,

    #[serde(default = "default_notification_body")]
    pub notification_body: String,
}

fn default_sound_command() -> String {
    "audacious --headless --quit-after-play FILE".to_string()
}

fn default_notification_title() -> String {
    "Timer".to_string()
}

fn default_notification_body() -> String {
    "Time is expired!".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound_command: default_sound_command(),
            notification_title: default_notification_title(),
            notification_body: default_notification_body(),
        }
    }
}

impl Config {
    /// Load `config.json` from `config_dir`, then apply `TIMER_SOUND_CMD`
    /// on top. An unreadable or malformed file is logged and replaced by
    /// the defaults, so operations that never use it still run.
    pub fn load(config_dir: &Path) -> Self {
        let path = config_dir.join(CONFIG_FILE);
        let mut config = Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config file, using defaults: {:#}", e);
            Self::default()
        });
        config.apply_sound_command_override(std::env::var(SOUND_CMD_ENV).ok());
        config
    }

    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// An unset or empty override leaves the configured command in place.
    pub fn apply_sound_command_override(&mut self, value: Option<String>) {
        if let Some(command) = value.filter(|c| !c.trim().is_empty()) {
            tracing::debug!("Using sound command from {}: {}", SOUND_CMD_ENV, command);
            self.sound_command = command;
        }
    }
}

/// Root directory for timer state, derived from `HOME`.
pub fn config_dir() -> Result<PathBuf, TimerError> {
    let home = std::env::var_os("HOME").ok_or(TimerError::HomeNotSet)?;
    Ok(config_dir_in(Path::new(&home)))
}

/// Directory holding the sound library.
pub fn sounds_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("sounds")
}

#[cfg(not(windows))]
fn config_dir_in(home: &Path) -> PathBuf {
    home.join(".config").join("timer")
}

#[cfg(windows)]
fn config_dir_in(home: &Path) -> PathBuf {
    home.join("AppData").join("timer")
}
