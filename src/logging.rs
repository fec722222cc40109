use crate::constants::LOG_FILE_DEFAULT;
use anyhow::Result;
use chrono::SecondsFormat;
use fern::colors::{Color, ColoredLevelConfig};
use fern::Dispatch;
use log::LevelFilter;
use std::str::FromStr;

/// Verbosity level for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages (default)
    Warning,
    /// Info, warning, and error messages
    Info,
    /// Debug, info, warning, and error messages
    Debug,
    /// Trace, debug, info, warning, and error messages
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Unknown verbosity level: {s}")),
        }
    }
}

impl LogLevel {
    /// Convert verbosity level to log::LevelFilter
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }

    /// Get the verbosity level from the number of occurrences of a flag
    pub fn from_occurrences(occurrences: u8) -> Self {
        match occurrences {
            0 => LogLevel::Warning, // Default
            1 => LogLevel::Info,    // -v
            2 => LogLevel::Debug,   // -vv
            _ => LogLevel::Trace,   // -vvv or more
        }
    }
}

/// Initialise the logger with the specified verbosity level
///
/// Console output goes to stderr so parse and format results on stdout stay
/// machine readable, coloured only when stderr is a terminal. A non-empty
/// `log_file` adds a timestamped file sink.
pub fn init_logger(verbosity: LogLevel, log_file: &str) -> Result<()> {
    let level = verbosity.to_level_filter();
    let mut logger = Dispatch::new()
        .level(level)
        .chain(console_logger(atty::is(atty::Stream::Stderr)));

    if !log_file.is_empty() {
        logger = logger.chain(file_logger(log_file)?);
    }
    logger.apply()?;

    log::debug!("Logger initialized with verbosity level: {verbosity:?}");

    Ok(())
}

fn console_logger(use_color: bool) -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::White)
        .trace(Color::BrightBlack);

    Dispatch::new()
        .format(move |out, message, record| {
            let color = use_color.then(|| colors.get_color(&record.level()));
            out.finish(format_args!("{}", console_line(color, &message.to_string())))
        })
        .chain(std::io::stderr())
}

fn file_logger(log_file: &str) -> Result<Dispatch> {
    Ok(Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(fern::log_file(log_file)?))
}

// Console line, wrapped in ANSI colour codes when a colour is given
fn console_line(color: Option<Color>, message: &str) -> String {
    match color {
        Some(color) => format!("\x1B[{}m{}\x1B[0m", color.to_fg_str(), message),
        None => message.to_string(),
    }
}

/// Initialise the logger with the default verbosity level (Warning)
pub fn init_default_logger() -> Result<()> {
    init_logger(LogLevel::Warning, LOG_FILE_DEFAULT)
}

/// Format a message with colour support
pub fn format_message(message: &str, colored_message: &str) -> String {
    if atty::is(atty::Stream::Stdout) {
        colored_message.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_names() {
        let cases = [
            ("error", LogLevel::Error, LevelFilter::Error),
            ("WARN", LogLevel::Warning, LevelFilter::Warn),
            ("Warning", LogLevel::Warning, LevelFilter::Warn),
            ("info", LogLevel::Info, LevelFilter::Info),
            ("debug", LogLevel::Debug, LevelFilter::Debug),
            ("trace", LogLevel::Trace, LevelFilter::Trace),
        ];

        for (name, level, filter) in cases {
            let parsed: LogLevel = name.parse().unwrap();
            assert_eq!(parsed, level, "Parsing '{name}'");
            assert_eq!(parsed.to_level_filter(), filter);
        }

        assert_eq!(
            "verbose".parse::<LogLevel>().unwrap_err(),
            "Unknown verbosity level: verbose"
        );
    }

    #[test]
    fn test_log_level_from_occurrences() {
        assert_eq!(LogLevel::from_occurrences(0), LogLevel::Warning);
        assert_eq!(LogLevel::from_occurrences(1), LogLevel::Info);
        assert_eq!(LogLevel::from_occurrences(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_occurrences(3), LogLevel::Trace);
        assert_eq!(LogLevel::from_occurrences(255), LogLevel::Trace);
    }

    #[test]
    fn test_console_line_colour() {
        assert_eq!(console_line(None, "Plain"), "Plain");
        assert_eq!(console_line(Some(Color::Red), "Failed"), "\x1B[31mFailed\x1B[0m");
    }

    #[test]
    fn test_format_message() {
        // format_message depends on whether stdout is a terminal, so only
        // check that one of the two variants comes back.
        let plain_message = "Test message";
        let colored_message = "\x1B[32mTest message\x1B[0m";

        let result = format_message(plain_message, colored_message);
        assert!(
            result == plain_message || result == colored_message,
            "Result should be either the plain message or the colored message"
        );
    }
}
