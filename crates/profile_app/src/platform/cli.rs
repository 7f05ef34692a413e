use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Watch a remote file manifest and show which files are new.
#[derive(Debug, Parser)]
#[command(name = "profile-watch", version, about)]
pub struct Cli {
    /// RON configuration file. Defaults to ./profile_watch.ron when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, global = true, value_parser = parse_log_level)]
    pub log_level: Option<log::LevelFilter>,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Keep logging to stderr when --log-file is given.
    #[arg(long, global = true, requires = "log_file")]
    pub log_to_terminal: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load the file list and keep polling for changes (default).
    Watch(WatchArgs),
    /// Scan a directory for .txt files and write the manifest.
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct WatchArgs {
    /// Server root that hosts the manifest and the content directory.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Load once and only refresh on request.
    #[arg(long)]
    pub no_poll: bool,
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Directory to scan. Defaults to the configured content directory.
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Manifest to write. Defaults to the configured manifest path.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

fn parse_log_level(raw: &str) -> Result<log::LevelFilter, String> {
    engine_logging::parse_level(raw).ok_or_else(|| format!("unknown log level `{raw}`"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn watch_is_optional() {
        let cli = Cli::try_parse_from(["profile-watch"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "profile-watch",
            "watch",
            "--base-url",
            "http://host/",
            "--log-level",
            "debug",
            "--no-poll",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(log::LevelFilter::Debug));
        match cli.command {
            Some(Command::Watch(args)) => {
                assert_eq!(args.base_url.as_deref(), Some("http://host/"));
                assert!(args.no_poll);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_to_terminal_needs_log_file() {
        let cli = Cli::try_parse_from([
            "profile-watch",
            "--log-file",
            "watch.log",
            "--log-to-terminal",
        ])
        .unwrap();
        assert!(cli.log_to_terminal);
        assert_eq!(cli.log_file, Some(std::path::PathBuf::from("watch.log")));

        assert!(Cli::try_parse_from(["profile-watch", "--log-to-terminal"]).is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["profile-watch", "--log-level", "loud"]).is_err());
    }
}
