use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::TimerError;

/// Token in the sound command that is replaced by the sound file path.
pub const FILE_PLACEHOLDER: &str = "FILE";

#[async_trait]
pub trait Player: Send + Sync {
    /// Play the file at `path`, returning once playback has finished.
    async fn play(&self, path: &Path) -> Result<(), TimerError>;
}

/// Plays sounds by running an external command built from a template
/// such as `ffplay -nodisp -autoexit FILE`.
pub struct CommandPlayer {
    template: String,
}

impl CommandPlayer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Split the template into program and arguments with the path
    /// substituted into the first token containing the placeholder.
    fn command_line(&self, path: &Path) -> Result<Vec<String>, TimerError> {
        let mut parts: Vec<String> = self.template.split_whitespace().map(String::from).collect();
        if parts.is_empty() {
            return Err(TimerError::Playback("sound command is empty".to_string()));
        }

        let slot = parts
            .iter_mut()
            .find(|part| part.contains(FILE_PLACEHOLDER))
            .ok_or_else(|| {
                TimerError::Playback(format!(
                    "sound command {:?} has no {} placeholder",
                    self.template, FILE_PLACEHOLDER
                ))
            })?;
        *slot = slot.replacen(FILE_PLACEHOLDER, &path.to_string_lossy(), 1);

        Ok(parts)
    }
}

#[async_trait]
impl Player for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<(), TimerError> {
        let parts = self.command_line(path)?;
        tracing::debug!("Running sound command: {:?}", parts);

        let output = Command::new(&parts[0])
            .args(&parts[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TimerError::Playback(format!("failed to run {}: {}", parts[0], e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TimerError::Playback(format!(
                "{} exited with {}: {}",
                parts[0],
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
