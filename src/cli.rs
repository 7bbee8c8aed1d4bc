//! Command-line arguments.
//!
//! Long flags may be written with a single dash (`-time 5m`, `-sounds`) as
//! well as the usual `--time 5m`; single-dash long names are rewritten
//! before clap sees them.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::dispatch::{Flag, FlagSet};

const LONG_NAMES: [&str; 8] = [
    "time",
    "sound",
    "sounds",
    "notify",
    "addsound",
    "deletesound",
    "verbose",
    "help",
];

const AFTER_HELP: &str = "\
The command used to play a sound is read from the environment variable
TIMER_SOUND_CMD. It must contain the placeholder FILE where the sound file
path should appear. The default command is:
    audacious --headless --quit-after-play FILE

Added sounds are stored in $HOME/.config/timer/sounds on Linux and macOS and
in %HOME%\\AppData\\timer\\sounds on Windows. The name of a sound is its file
name without the extension.

Time values have the format 1h20m30s. Some valid examples are:
    2h          2 hours
    1h5m        1 hour 5 minutes
    5h10m10s    5 hours 10 minutes 10 seconds
    70m         70 minutes
    100s        100 seconds
    2m200s      2 minutes 200 seconds

Examples:
    $ export TIMER_SOUND_CMD=\"ffplay -nodisp -autoexit -i FILE -hide_banner -loglevel panic\"
    $ timer -t 30m
    $ timer -t 30m -s Alien
    $ timer -t 30m -s Alien -notify
    $ timer -sound Rooster";

/// Set a timer. Play a sound when the timer expires. Receive a notification
/// when the timer expires.
#[derive(Parser, Debug, Default)]
#[command(name = "timer", version, after_help = AFTER_HELP)]
pub struct ArgumentSet {
    /// Time value
    #[arg(short = 't', long = "time", value_name = "TIME")]
    pub time: Option<String>,

    /// Play this sound (after the timer expires when a time is given)
    #[arg(short = 's', long = "sound", value_name = "NAME")]
    pub sound: Option<String>,

    /// Show the list of available sounds
    #[arg(short = 'l', long = "sounds")]
    pub sounds: bool,

    /// Show a notification when the timer expires
    #[arg(short = 'n', long = "notify")]
    pub notify: bool,

    /// Add FILE to the sound library
    #[arg(short = 'a', long = "addsound", value_name = "FILE")]
    pub add_sound: Option<PathBuf>,

    /// Remove the sound named NAME from the sound library
    #[arg(short = 'd', long = "deletesound", value_name = "NAME")]
    pub delete_sound: Option<String>,

    /// Print more details on error
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl ArgumentSet {
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize(args))
    }

    /// Which dispatch flags are present. Empty string values count as absent.
    pub fn flags(&self) -> FlagSet {
        let mut flags = FlagSet::empty();
        flags.set(Flag::Time, present(self.time.as_deref()));
        flags.set(Flag::Sound, present(self.sound.as_deref()));
        flags.set(Flag::Sounds, self.sounds);
        flags.set(Flag::Notify, self.notify);
        flags.set(
            Flag::AddSound,
            self.add_sound.as_ref().is_some_and(|p| !p.as_os_str().is_empty()),
        );
        flags.set(Flag::DeleteSound, present(self.delete_sound.as_deref()));
        flags
    }
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Rewrite `-name` and `-name=value` to their double-dash form for the
/// known long flag names. Everything after a bare `--` is left alone.
fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if LONG_NAMES.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> ArgumentSet {
        ArgumentSet::try_parse_args(std::iter::once("timer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_single_dash_long_flags() {
        let args = parse(&["-time", "5m", "-sound", "Alien", "-notify", "-verbose"]);
        assert_eq!(args.time.as_deref(), Some("5m"));
        assert_eq!(args.sound.as_deref(), Some("Alien"));
        assert!(args.notify);
        assert!(args.verbose);
    }

    #[test]
    fn test_equals_form_and_short_flags() {
        let args = parse(&["-time=1h", "-l"]);
        assert_eq!(args.time.as_deref(), Some("1h"));
        assert!(args.sounds);

        let args = parse(&["--deletesound", "Rooster"]);
        assert_eq!(args.delete_sound.as_deref(), Some("Rooster"));

        let args = parse(&["-a", "/tmp/Gong.ogg"]);
        assert_eq!(args.add_sound, Some(PathBuf::from("/tmp/Gong.ogg")));
    }

    #[test]
    fn test_normalize_rewrites_only_known_long_names() {
        assert_eq!(
            normalize(["timer", "-s", "-sounds", "-x", "-addsound=/tmp/a.wav"]),
            vec![
                OsString::from("timer"),
                OsString::from("-s"),
                OsString::from("--sounds"),
                OsString::from("-x"),
                OsString::from("--addsound=/tmp/a.wav"),
            ]
        );
        assert_eq!(
            normalize(["timer", "--", "-time"]),
            vec![
                OsString::from("timer"),
                OsString::from("--"),
                OsString::from("-time"),
            ]
        );
    }

    #[test]
    fn test_flags_bitmask() {
        let flags = parse(&["-t", "1s", "-s", "Alien", "-n"]).flags();
        assert_eq!(
            flags,
            FlagSet::empty()
                .with(Flag::Time)
                .with(Flag::Sound)
                .with(Flag::Notify)
        );
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let flags = parse(&["-t", "", "-sounds"]).flags();
        assert_eq!(flags, FlagSet::empty().with(Flag::Sounds));
    }

    #[test]
    fn test_help_and_unknown_flags() {
        let err = ArgumentSet::try_parse_args(["timer", "-help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = ArgumentSet::try_parse_args(["timer", "-bogus"]).unwrap_err();
        assert_ne!(err.kind(), ErrorKind::DisplayHelp);
    }
}
