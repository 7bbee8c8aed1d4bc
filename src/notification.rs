use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::TimerError;

#[cfg(target_os = "macos")]
pub const DEFAULT_NOTIFIER: &str = "osascript";
#[cfg(windows)]
pub const DEFAULT_NOTIFIER: &str = "msg";
#[cfg(not(any(target_os = "macos", windows)))]
pub const DEFAULT_NOTIFIER: &str = "notify-send";

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, body: &str) -> Result<(), TimerError>;
}

/// Raises a desktop notification through the platform's notification tool.
pub struct DesktopNotifier {
    program: String,
}

impl DesktopNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, title: &str, body: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(notifier_args(title, body));
        cmd
    }
}

#[cfg(target_os = "macos")]
fn notifier_args(title: &str, body: &str) -> Vec<String> {
    let escape = |s: &str| s.replace('\\', "\\\\").replace('"', "\\\"");
    vec![
        "-e".to_string(),
        format!(
            "display notification \"{}\" with title \"{}\"",
            escape(body),
            escape(title)
        ),
    ]
}

#[cfg(windows)]
fn notifier_args(title: &str, body: &str) -> Vec<String> {
    vec!["*".to_string(), format!("{}: {}", title, body)]
}

#[cfg(not(any(target_os = "macos", windows)))]
fn notifier_args(title: &str, body: &str) -> Vec<String> {
    vec![
        "--app-name=timer".to_string(),
        title.to_string(),
        body.to_string(),
    ]
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), TimerError> {
        tracing::debug!("Showing notification {:?}: {:?}", title, body);

        let output = self
            .command(title, body)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                TimerError::Notification(format!("failed to spawn {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TimerError::Notification(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
