use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::cli::ArgumentSet;
use crate::config::Config;
use crate::countdown::{Countdown, ProgressSink, TerminalProgress};
use crate::dispatch::{self, Operation};
use crate::duration;
use crate::error::TimerError;
use crate::library::SoundLibrary;
use crate::notification::{self, DesktopNotifier, Notifier};
use crate::player::{CommandPlayer, Player};

pub struct App {
    args: ArgumentSet,
    library: SoundLibrary,
    notification_title: String,
    notification_body: String,
    player: Box<dyn Player>,
    notifier: Box<dyn Notifier>,
    progress: Arc<dyn ProgressSink>,
}

impl App {
    pub fn new(args: ArgumentSet, library: SoundLibrary, config: Config) -> Self {
        Self {
            args,
            library,
            player: Box::new(CommandPlayer::new(config.sound_command)),
            notifier: Box::new(DesktopNotifier::new(notification::DEFAULT_NOTIFIER)),
            progress: Arc::new(TerminalProgress::stdout()),
            notification_title: config.notification_title,
            notification_body: config.notification_body,
        }
    }

    /// Resolve the supplied flags to one operation and run it.
    pub async fn run(&self) -> Result<(), TimerError> {
        let operation = dispatch::resolve(self.args.flags())?;
        self.execute(operation).await
    }

    async fn execute(&self, operation: Operation) -> Result<(), TimerError> {
        match operation {
            Operation::Timed => self.timed().await,
            Operation::TimedSound => {
                self.require_sound()?;
                self.timed().await?;
                self.play_sound().await
            }
            Operation::TimedNotify => {
                self.timed().await?;
                self.notify().await
            }
            Operation::TimedSoundNotify => {
                self.timed().await?;
                self.notify().await?;
                self.play_sound().await
            }
            Operation::ListSounds => {
                let mut out = std::io::stdout().lock();
                self.list_sounds(&mut out)
            }
            Operation::PlaySound => self.play_sound().await,
            Operation::AddSound => self.add_sound().await,
            Operation::DeleteSound => self.delete_sound().await,
        }
    }

    async fn timed(&self) -> Result<(), TimerError> {
        let total = duration::parse(self.args.time.as_deref().unwrap_or_default())?;
        Countdown::new(total).run(self.progress.clone()).await;
        Ok(())
    }

    fn sound_name(&self) -> &str {
        self.args.sound.as_deref().unwrap_or_default()
    }

    fn require_sound(&self) -> Result<&Path, TimerError> {
        let name = self.sound_name();
        self.library
            .lookup(name)
            .ok_or_else(|| TimerError::SoundNotFound(name.to_string()))
    }

    async fn play_sound(&self) -> Result<(), TimerError> {
        let path = self.require_sound()?;
        tracing::debug!("Playing sound {} from {:?}", self.sound_name(), path);
        self.player.play(path).await
    }

    async fn notify(&self) -> Result<(), TimerError> {
        self.notifier
            .notify(&self.notification_title, &self.notification_body)
            .await
    }

    fn list_sounds(&self, out: &mut impl Write) -> Result<(), TimerError> {
        for name in self.library.names() {
            // A closed stdout leaves nothing useful to report.
            if writeln!(out, "{}", name).is_err() {
                break;
            }
        }
        Ok(())
    }

    async fn add_sound(&self) -> Result<(), TimerError> {
        match self.args.add_sound.as_deref() {
            Some(source) => self.library.add(source).await.map(|_| ()),
            None => Err(TimerError::InvalidArgumentCombination),
        }
    }

    async fn delete_sound(&self) -> Result<(), TimerError> {
        self.library
            .delete(self.args.delete_sound.as_deref().unwrap_or_default())
            .await
    }
}
