use bell_config::BellConfig;
use bell_timetable::{Tz, date_timespan};
use chrono::{NaiveDate, SecondsFormat, TimeDelta};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TimespanArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct TimespanResponse {
    pub date: NaiveDate,
    pub timezone: String,
    pub start: String,
    pub end: String,
    /// Wall length as H:MM:SS.ffffff.
    pub length: String,
}

/// Handle `bell timespan`.
pub fn handle(args: &TimespanArgs, config: &BellConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tz = super::observer_timezone(flags, config)?;
    output(&timespan(args.date, tz), flags.format)
}

fn timespan(date: NaiveDate, tz: Tz) -> TimespanResponse {
    let (start, end) = date_timespan(date, tz);
    TimespanResponse {
        date,
        timezone: tz.name().to_string(),
        start: start.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        end: end.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        length: format_length(end - start),
    }
}

fn format_length(length: TimeDelta) -> String {
    let seconds = length.num_seconds();
    let micros = length.subsec_nanos() / 1_000;
    format!(
        "{}:{:02}:{:02}.{micros:06}",
        seconds / 3_600,
        (seconds % 3_600) / 60,
        seconds % 60
    )
}
