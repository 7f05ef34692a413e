//! Logger initialization for the watch client.
//!
//! The terminal UI owns stdout, so terminal logging goes to stderr.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file, truncating it.
    File(PathBuf),
    /// Write to stderr.
    Terminal,
    /// Write to the given file and to stderr.
    Both(PathBuf),
}

impl LogDestination {
    pub fn select(log_file: Option<PathBuf>, also_terminal: bool) -> Self {
        match (log_file, also_terminal) {
            (Some(path), true) => LogDestination::Both(path),
            (Some(path), false) => LogDestination::File(path),
            (None, _) => LogDestination::Terminal,
        }
    }
}

pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File(path) => match create_file_logger(path, level, config.clone()) {
            Some(file_logger) => vec![file_logger],
            None => vec![terminal_logger(level, config)],
        },
        LogDestination::Terminal => vec![terminal_logger(level, config)],
        LogDestination::Both(path) => {
            let mut loggers = vec![terminal_logger(level, config.clone())];
            if let Some(file_logger) = create_file_logger(path, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn create_file_logger(
    log_path: PathBuf,
    level: LevelFilter,
    config: Config,
) -> Option<Box<dyn SharedLogger>> {
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file) as Box<dyn SharedLogger>),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::LogDestination;

    #[test]
    fn log_file_alone_silences_terminal() {
        assert_eq!(
            LogDestination::select(Some(PathBuf::from("watch.log")), false),
            LogDestination::File(PathBuf::from("watch.log"))
        );
    }

    #[test]
    fn log_file_with_terminal_writes_both() {
        assert_eq!(
            LogDestination::select(Some(PathBuf::from("watch.log")), true),
            LogDestination::Both(PathBuf::from("watch.log"))
        );
    }

    #[test]
    fn terminal_is_the_default() {
        assert_eq!(LogDestination::select(None, false), LogDestination::Terminal);
        assert_eq!(LogDestination::select(None, true), LogDestination::Terminal);
    }
}
