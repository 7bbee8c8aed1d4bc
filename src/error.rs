use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by timer operations.
///
/// `Display` carries the full detail; [`TimerError::summary`] is the short
/// line printed even when verbose output is off.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("received invalid set of options")]
    InvalidArgumentCombination,

    #[error("invalid time value {input:?}: {reason}")]
    DurationParse { input: String, reason: &'static str },

    #[error("sound {0:?} not found in library")]
    SoundNotFound(String),

    #[error("HOME environment variable not set")]
    HomeNotSet,

    #[error("sounds directory {}: {source}", .path.display())]
    ConfigDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sound file {}: {source}", .path.display())]
    SoundFileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sound command failed: {0}")]
    Playback(String),

    #[error("notification failed: {0}")]
    Notification(String),
}

impl TimerError {
    pub fn summary(&self) -> &'static str {
        match self {
            Self::InvalidArgumentCombination => "Received invalid set of options",
            Self::DurationParse { .. } => "Error parsing time value",
            Self::SoundNotFound(_) => "Selected sound not found",
            Self::HomeNotSet | Self::ConfigDirectory { .. } => "Error accessing sounds directory",
            Self::SoundFileIo { .. } => "Error accessing sound file",
            Self::Playback(_) => "Error playing sound",
            Self::Notification(_) => "Error showing notification",
        }
    }

    pub(crate) fn sound_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SoundFileIo {
            path: path.into(),
            source,
        }
    }
}
