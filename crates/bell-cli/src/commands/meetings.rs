use std::sync::Arc;

use anyhow::Context;
use bell_config::BellConfig;
use bell_timetable::{Meeting, Schedule, SelectedPeriodsSchedule, Timetable, Tz, iter_meetings_in_tz};
use chrono::SecondsFormat;
use serde::Serialize;
use tracing::debug;

use crate::cli::root_commands::MeetingsArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::definition::TimetableDefinition;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct MeetingRow {
    pub meeting_id: Option<String>,
    pub day_id: Option<String>,
    pub period: Option<String>,
    /// Start in the observer's timezone.
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
    pub activities: Vec<String>,
}

impl MeetingRow {
    fn new(meeting: &Meeting, timetable: &Timetable, tz: Tz) -> Self {
        Self {
            meeting_id: meeting.meeting_id.clone(),
            day_id: meeting.day_id.clone(),
            period: meeting.period.as_ref().map(|p| p.id.clone()),
            start: meeting
                .dtstart
                .with_timezone(&tz)
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            end: meeting
                .end()
                .with_timezone(&tz)
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            duration_minutes: meeting.duration.num_minutes(),
            activities: timetable
                .activities_for(meeting)
                .iter()
                .map(|a| a.title.clone())
                .collect(),
        }
    }

    fn to_line(&self) -> String {
        let mut line = format!(
            "{}  {}  {}",
            self.start,
            self.day_id.as_deref().unwrap_or("-"),
            self.period.as_deref().unwrap_or("-")
        );
        if !self.activities.is_empty() {
            line.push_str("  ");
            line.push_str(&self.activities.join(", "));
        }
        line
    }
}

/// Handle `bell meetings`.
pub fn handle(args: &MeetingsArgs, config: &BellConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tz = super::observer_timezone(flags, config)?;
    let definition = TimetableDefinition::from_path(&args.file)?;
    let timetable = Arc::new(definition.build(&config.timetable)?);
    let rows = list_meetings(&timetable, args, tz)?;
    debug!(count = rows.len(), observer = %tz, "listed meetings");

    match flags.format {
        OutputFormat::Text if rows.is_empty() => {
            println!("(no meetings)");
            Ok(())
        }
        OutputFormat::Text => {
            for row in &rows {
                println!("{}", row.to_line());
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(&rows, flags.format),
    }
}

fn list_meetings(timetable: &Arc<Timetable>, args: &MeetingsArgs, tz: Tz) -> anyhow::Result<Vec<MeetingRow>> {
    let until = args.until.unwrap_or(args.from);
    let meetings: Vec<Meeting> = if args.periods.is_empty() {
        iter_meetings_in_tz(timetable.as_ref(), tz, args.from, Some(until)).collect()
    } else {
        let mut schedule =
            SelectedPeriodsSchedule::new(timetable.title.as_str(), Arc::clone(timetable)).with_timezone(tz);
        schedule.consecutive_periods_as_one = args.merge_consecutive;
        for key in &args.periods {
            let (day, period) = key
                .split_once(':')
                .with_context(|| format!("period '{key}' must look like DAY:PERIOD"))?;
            schedule
                .add_period(day, period)
                .with_context(|| format!("cannot select period '{key}'"))?;
        }
        schedule.iter_meetings(args.from, until).collect()
    };
    Ok(meetings
        .iter()
        .map(|meeting| MeetingRow::new(meeting, timetable, tz))
        .collect())
}
