use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `bell` binary.
#[derive(Debug, Parser)]
#[command(name = "bell", version, about = "SchoolBell - timetables across timezones")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, text, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Observer timezone (defaults to general.timezone from config)
    #[arg(short, long, global = true)]
    pub timezone: Option<String>,

    /// Read configuration from this file instead of the usual locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            timezone: self.timezone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "bell",
            "--format",
            "text",
            "--timezone",
            "Europe/Vilnius",
            "timespan",
            "2011-10-30",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.timezone.as_deref(), Some("Europe/Vilnius"));
        let Commands::Timespan(args) = cli.command else {
            panic!("expected timespan");
        };
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2011, 10, 30).unwrap());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["bell", "timespan", "2024-01-01", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn meetings_accepts_repeated_periods() {
        let cli = Cli::try_parse_from([
            "bell",
            "meetings",
            "week.toml",
            "--from",
            "2024-09-02",
            "--period",
            "Mon:Green",
            "--period",
            "Mon:Blue",
            "--merge-consecutive",
        ])
        .expect("cli should parse");

        let Commands::Meetings(args) = cli.command else {
            panic!("expected meetings");
        };
        assert_eq!(args.periods, vec!["Mon:Green", "Mon:Blue"]);
        assert!(args.merge_consecutive);
        assert_eq!(args.until, None);
    }

    #[test]
    fn merge_consecutive_needs_periods() {
        let parsed = Cli::try_parse_from(["bell", "meetings", "week.toml", "--from", "2024-09-02", "--merge-consecutive"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn invalid_date_is_rejected() {
        assert!(Cli::try_parse_from(["bell", "timespan", "2024-02-30"]).is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["bell", "--format", "xml", "timespan", "2024-01-01"]).is_err());
    }
}
