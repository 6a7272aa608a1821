use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Top-level commands for `bell`.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// First and last instant of a date in the observer's timezone.
    Timespan(TimespanArgs),
    /// Meetings of a timetable definition as seen from the observer's timezone.
    Meetings(MeetingsArgs),
}

/// Arguments for `bell timespan`.
#[derive(Clone, Debug, Args)]
pub struct TimespanArgs {
    /// Date as YYYY-MM-DD.
    pub date: NaiveDate,
}

/// Arguments for `bell meetings`.
#[derive(Clone, Debug, Args)]
pub struct MeetingsArgs {
    /// Timetable definition (TOML).
    pub file: PathBuf,
    /// First date, in the observer's timezone.
    #[arg(long)]
    pub from: NaiveDate,
    /// Last date (defaults to --from).
    #[arg(long)]
    pub until: Option<NaiveDate>,
    /// Only list this period, as DAY:PERIOD. Repeatable.
    #[arg(long = "period", value_name = "DAY:PERIOD")]
    pub periods: Vec<String>,
    /// Give back-to-back selected periods a single meeting id.
    #[arg(long, requires = "periods")]
    pub merge_consecutive: bool,
}
