use std::fmt::Display;

use clap::{ArgAction, Parser};
use tracing::{level_filters::LevelFilter, Level};

/// Severity tier of a logger. Ordered the same way as severities are numbered, so a stricter
/// level compares greater: `Debug < Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl From<&Level> for LogLevel {
    /// Trace events have no tier of their own and are reported as debug.
    fn from(value: &Level) -> Self {
        match *value {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warning,
            Level::INFO => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

/// Verbosity at which the whole application logs at debug level.
const DEBUG_VERBOSITY: u8 = 3;

/// Invocation options. Immutable once parsed, every logging level is derived on demand.
#[derive(Parser, Debug, Clone)]
#[command(name = "drops-miner", version = concat!("v", env!("CARGO_PKG_VERSION")))]
#[command(about = "A program that allows you to mine timed drops on Twitch.", long_about = None)]
pub struct Options {
    #[arg(short = 'v', action = ArgAction::Count, help = "Increase verbosity, can be repeated")]
    verbose: u8,
    #[arg(long = "debug-ws", help = "Trace raw websocket messages")]
    debug_ws: bool,
    #[arg(long = "debug-gql", help = "Trace raw GQL requests")]
    debug_gql: bool,
    #[arg(short, long, help = "Only mine drops for this game")]
    game: Option<String>,
    #[arg(long, help = "Start minimized to the tray")]
    tray: bool,
    #[arg(short, long, help = "Write application logs into a file")]
    log: bool,
}

impl Options {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn debug_ws(&self) -> bool {
        self.debug_ws
    }

    pub fn debug_gql(&self) -> bool {
        self.debug_gql
    }

    pub fn game(&self) -> Option<&str> {
        self.game.as_deref()
    }

    pub fn tray(&self) -> bool {
        self.tray
    }

    pub fn log(&self) -> bool {
        self.log
    }

    /// Main level of the application logger.
    pub fn logging_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    /// Level of the websocket logger. `None` means the level is inherited from the application
    /// logger.
    pub fn debug_ws_level(&self) -> Option<LogLevel> {
        subsystem_level(self.debug_ws, self.verbose)
    }

    /// Level of the GQL logger. `None` means the level is inherited from the application logger.
    pub fn debug_gql_level(&self) -> Option<LogLevel> {
        subsystem_level(self.debug_gql, self.verbose)
    }
}

/// Raw protocol traces are too noisy at the global debug tier, so without an explicit flag they
/// are capped one tier below it.
fn subsystem_level(forced: bool, verbosity: u8) -> Option<LogLevel> {
    if forced {
        Some(LogLevel::Debug)
    } else if verbosity >= DEBUG_VERBOSITY {
        Some(LogLevel::Info)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use clap::{error::ErrorKind, Parser};
    use tracing::level_filters::LevelFilter;

    use super::{subsystem_level, LogLevel, Options};

    fn parse(args: &[&str]) -> Result<Options> {
        Ok(Options::try_parse_from(
            std::iter::once("drops-miner").chain(args.iter().copied()),
        )?)
    }

    #[test]
    fn defaults() -> Result<()> {
        let options = parse(&[])?;
        assert_eq!(options.verbosity(), 0);
        assert!(!options.debug_ws());
        assert!(!options.debug_gql());
        assert!(!options.tray());
        assert!(!options.log());
        assert_eq!(options.game(), None);
        Ok(())
    }

    #[test]
    fn parses_every_flag() -> Result<()> {
        let options = parse(&[
            "-vv",
            "-v",
            "--debug-ws",
            "--debug-gql",
            "-g",
            "Rust",
            "--tray",
            "-l",
        ])?;
        assert_eq!(options.verbosity(), 3);
        assert!(options.debug_ws());
        assert!(options.debug_gql());
        assert_eq!(options.game(), Some("Rust"));
        assert!(options.tray());
        assert!(options.log());

        let options = parse(&["--game", "Minecraft", "--log"])?;
        assert_eq!(options.game(), Some("Minecraft"));
        assert!(options.log());
        Ok(())
    }

    #[test]
    fn version_flag_short_circuits() {
        for flag in ["-V", "--version"] {
            let error = parse(&[flag, "-vvv"])
                .unwrap_err()
                .downcast::<clap::Error>()
                .unwrap();
            assert_eq!(error.kind(), ErrorKind::DisplayVersion);
            assert!(error.to_string().contains(concat!("v", env!("CARGO_PKG_VERSION"))));
        }
    }

    #[test]
    fn logging_level_by_verbosity() -> Result<()> {
        let expected = [
            ("", LogLevel::Error),
            ("-v", LogLevel::Warning),
            ("-vv", LogLevel::Info),
            ("-vvv", LogLevel::Debug),
            ("-vvvvvvv", LogLevel::Debug),
        ];
        for (flag, level) in expected {
            let args: Vec<&str> = [flag].into_iter().filter(|v| !v.is_empty()).collect();
            assert_eq!(parse(&args)?.logging_level(), level, "verbosity flag {flag:?}");
        }
        Ok(())
    }

    #[test]
    fn logging_level_never_gets_stricter_with_verbosity() -> Result<()> {
        let mut previous = LogLevel::Error;
        for count in 0..12 {
            let flag = format!("-{}", "v".repeat(count));
            let args: Vec<&str> = if count == 0 { vec![] } else { vec![flag.as_str()] };
            let level = parse(&args)?.logging_level();
            assert!(level <= previous);
            if count >= 3 {
                assert_eq!(level, LogLevel::Debug);
            }
            previous = level;
        }
        Ok(())
    }

    #[test]
    fn forced_subsystem_is_always_debug() {
        for verbosity in [0, 1, 2, 3, 4, u8::MAX] {
            assert_eq!(subsystem_level(true, verbosity), Some(LogLevel::Debug));
        }
    }

    #[test]
    fn unforced_subsystem_inherits_below_debug_tier() {
        for verbosity in [0, 1, 2] {
            assert_eq!(subsystem_level(false, verbosity), None);
        }
        for verbosity in [3, 4, 10, u8::MAX] {
            assert_eq!(subsystem_level(false, verbosity), Some(LogLevel::Info));
        }
    }

    #[test]
    fn subsystem_flags_are_independent() -> Result<()> {
        let options = parse(&["-v", "--debug-ws"])?;
        assert_eq!(options.logging_level(), LogLevel::Warning);
        assert_eq!(options.debug_ws_level(), Some(LogLevel::Debug));
        assert_eq!(options.debug_gql_level(), None);

        let options = parse(&["-vvv", "--debug-gql"])?;
        assert_eq!(options.debug_ws_level(), Some(LogLevel::Info));
        assert_eq!(options.debug_gql_level(), Some(LogLevel::Debug));

        let options = parse(&["--debug-ws", "--debug-gql"])?;
        assert_eq!(options.debug_ws_level(), Some(LogLevel::Debug));
        assert_eq!(options.debug_gql_level(), Some(LogLevel::Debug));
        Ok(())
    }

    #[test]
    fn level_conversions() {
        assert!(LogLevel::Error > LogLevel::Warning);
        assert!(LogLevel::Info > LogLevel::Debug);
        assert_eq!(LevelFilter::from(LogLevel::Warning), LevelFilter::WARN);
        assert_eq!(LogLevel::from(&tracing::Level::TRACE), LogLevel::Debug);
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
    }
}
