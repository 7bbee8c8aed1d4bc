mod app;
mod cli;
mod config;
mod countdown;
mod dispatch;
mod duration;
mod error;
mod library;
mod notification;
mod player;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use tracing::Level;

use app::App;
use cli::ArgumentSet;
use config::Config;
use error::TimerError;
use library::SoundLibrary;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match ArgumentSet::try_parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            // Help and version requests print to stdout and are not failures.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let verbose = args.verbose;

    // Logs go to stderr so they never tear the progress line on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, verbose, &mut std::io::stderr().lock());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: ArgumentSet) -> Result<()> {
    run_in(&config::config_dir()?, args).await
}

async fn run_in(config_dir: &Path, args: ArgumentSet) -> Result<()> {
    // Every operation needs the library, so a broken sounds directory is
    // fatal before dispatch.
    let library = SoundLibrary::load(config::sounds_dir(config_dir))?;
    let config = Config::load(config_dir);

    App::new(args, library, config).run().await?;
    Ok(())
}

fn report(err: &anyhow::Error, verbose: bool, out: &mut impl Write) {
    let summary = match err.downcast_ref::<TimerError>() {
        Some(TimerError::InvalidArgumentCombination) => {
            "Received invalid set of options\nType 'timer -help' to see how to use"
        }
        Some(e) => e.summary(),
        None => "Error",
    };
    let _ = writeln!(out, "{}", summary);

    if verbose {
        let _ = writeln!(out, "{:#}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> ArgumentSet {
        ArgumentSet::try_parse_args(std::iter::once("timer").chain(list.iter().copied())).unwrap()
    }

    fn report_text(err: TimerError, verbose: bool) -> String {
        let mut out = Vec::new();
        report(&anyhow::Error::from(err), verbose, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_list_sounds_ignores_malformed_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(config::sounds_dir(dir.path())).unwrap();
        std::fs::write(config::sounds_dir(dir.path()).join("Alien.mp3"), b"RIFF").unwrap();
        std::fs::write(dir.path().join("config.json"), "{ bad").unwrap();

        run_in(dir.path(), args(&["-l"])).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_creates_sounds_directory_before_dispatch() {
        let dir = TempDir::new().unwrap();

        let err = run_in(dir.path(), args(&["-n"])).await.unwrap_err();

        assert!(config::sounds_dir(dir.path()).is_dir());
        assert!(matches!(
            err.downcast_ref::<TimerError>(),
            Some(TimerError::InvalidArgumentCombination)
        ));
    }

    #[test]
    fn test_report_invalid_combination_points_to_help() {
        assert_eq!(
            report_text(TimerError::InvalidArgumentCombination, false),
            "Received invalid set of options\nType 'timer -help' to see how to use\n"
        );
    }

    #[test]
    fn test_report_detail_only_when_verbose() {
        let err = || TimerError::SoundNotFound("UnknownName".to_string());

        assert_eq!(report_text(err(), false), "Selected sound not found\n");
        assert_eq!(
            report_text(err(), true),
            "Selected sound not found\nsound \"UnknownName\" not found in library\n"
        );
    }
}
