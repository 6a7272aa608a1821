//! Meetings and timezone-aware schedule iteration.
//!
//! Every meeting is stored as a UTC instant. A schedule enumerates meetings
//! by local date in its own timezone; [`iter_meetings_in_timezone`] answers
//! "what happens on this date" for an observer in a different timezone by
//! translating the observer's local day into the schedule's dates and
//! filtering by instant. On a daylight saving transition the observer's day
//! is 23 or 25 hours long, so the number of meetings changes with it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::trace;

use crate::error::TimetableError;
use crate::schema::Period;
use crate::timetable::Timetable;

// ---------------------------------------------------------------------------
// Meeting
// ---------------------------------------------------------------------------

/// One dated occurrence of a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meeting {
    pub dtstart: DateTime<Utc>,
    pub duration: TimeDelta,
    pub day_id: Option<String>,
    pub period: Option<Period>,
    pub meeting_id: Option<String>,
}

impl Meeting {
    #[must_use]
    pub const fn new(dtstart: DateTime<Utc>, duration: TimeDelta) -> Self {
        Self {
            dtstart,
            duration,
            day_id: None,
            period: None,
            meeting_id: None,
        }
    }

    #[must_use]
    pub fn with_period(mut self, day_id: impl Into<String>, period: Period) -> Self {
        self.day_id = Some(day_id.into());
        self.period = Some(period);
        self
    }

    #[must_use]
    pub fn with_meeting_id(mut self, meeting_id: impl Into<String>) -> Self {
        self.meeting_id = Some(meeting_id.into());
        self
    }

    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.dtstart + self.duration
    }

    /// The date the meeting starts on, as seen in `tz`.
    #[must_use]
    pub fn local_date(&self, tz: Tz) -> NaiveDate {
        self.dtstart.with_timezone(&tz).date_naive()
    }
}

/// Stable id of the `n`th (1-based) meeting on `date`.
///
/// Uses the period id when there is one, percent-encoded.
#[must_use]
pub fn period_meeting_id(date: NaiveDate, period: Option<&Period>, n: usize) -> String {
    match period.map(|p| p.id.trim()).filter(|id| !id.is_empty()) {
        Some(id) => format!("{date}.{}", urlencoding::encode(id)),
        None => format!("{date}.{n}"),
    }
}

// ---------------------------------------------------------------------------
// Local time
// ---------------------------------------------------------------------------

/// Resolve a wall-clock time in `tz`.
///
/// A time skipped by a spring-forward gap keeps the offset in effect before
/// the gap. A time repeated by a fall-back overlap resolves to the later
/// instant.
#[must_use]
pub fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(first, second) => first.max(second),
        LocalResult::None => {
            let before = tz.from_local_datetime(&(naive - TimeDelta::days(1))).earliest();
            let offset = before.map_or(0, |dt| dt.offset().fix().local_minus_utc());
            tz.from_utc_datetime(&(naive - TimeDelta::seconds(i64::from(offset))))
        }
    }
}

/// First and last instant of `date` in `tz`.
///
/// The span is 23, 24 or 25 hours long (less one microsecond) depending on
/// daylight saving transitions that day.
#[must_use]
pub fn date_timespan(date: NaiveDate, tz: Tz) -> (DateTime<Tz>, DateTime<Tz>) {
    let midnight = date.and_time(NaiveTime::MIN);
    let start = localize(tz, midnight);
    let end = localize(tz, midnight + TimeDelta::days(1) - TimeDelta::microseconds(1));
    (start, end)
}

/// # Errors
///
/// Returns `TimetableError::UnknownTimezone` for names missing from the IANA
/// database.
pub fn parse_timezone(name: &str) -> Result<Tz, TimetableError> {
    name.parse::<Tz>()
        .map_err(|_| TimetableError::UnknownTimezone(name.to_string()))
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Something that produces meetings.
pub trait Schedule {
    fn title(&self) -> &str;

    /// Timezone the schedule's dates are expressed in.
    fn timezone(&self) -> Tz;

    fn first(&self) -> Option<NaiveDate>;

    fn last(&self) -> Option<NaiveDate>;

    /// Meetings on local dates `from..=until`, in this schedule's timezone,
    /// ordered by date and start.
    fn iter_meetings(&self, from: NaiveDate, until: NaiveDate) -> Box<dyn Iterator<Item = Meeting> + '_>;
}

/// Meetings of `schedule` on dates `date..=until` as seen from `tz`.
///
/// `until` defaults to `date`.
pub fn iter_meetings_in_tz<S: Schedule + ?Sized>(
    schedule: &S,
    tz: Tz,
    date: NaiveDate,
    until: Option<NaiveDate>,
) -> impl Iterator<Item = Meeting> + '_ {
    let (start, _) = date_timespan(date, tz);
    let (_, end) = date_timespan(until.unwrap_or(date), tz);
    let native = schedule.timezone();
    let from = start.with_timezone(&native).date_naive();
    let to = end.with_timezone(&native).date_naive();
    let start = start.with_timezone(&Utc);
    let end = end.with_timezone(&Utc);
    trace!(observer = %tz, schedule = %native, %from, %to, "translated observer days");
    schedule
        .iter_meetings(from, to)
        .filter(move |meeting| start <= meeting.dtstart && meeting.dtstart <= end)
}

/// Like [`iter_meetings_in_tz`] with the timezone given by name.
///
/// # Errors
///
/// Returns `TimetableError::UnknownTimezone` before producing anything if
/// `timezone` is not a known IANA name.
pub fn iter_meetings_in_timezone<'a, S: Schedule + ?Sized>(
    schedule: &'a S,
    timezone: &str,
    date: NaiveDate,
    until: Option<NaiveDate>,
) -> Result<impl Iterator<Item = Meeting> + use<'a, S>, TimetableError> {
    let tz = parse_timezone(timezone)?;
    Ok(iter_meetings_in_tz(schedule, tz, date, until))
}

/// Replace meetings on exception dates.
///
/// Original meetings whose local date (in `tz`) has an entry in `exceptions`
/// are dropped; the entries dated `from..=until` are used instead. The result
/// is grouped by date and sorted by start within each date.
pub fn iter_meetings_with_exceptions<I>(
    meetings: I,
    exceptions: &BTreeMap<NaiveDate, Vec<Meeting>>,
    tz: Tz,
    from: NaiveDate,
    until: NaiveDate,
) -> impl Iterator<Item = Meeting> + use<I>
where
    I: IntoIterator<Item = Meeting>,
{
    let mut by_date: BTreeMap<NaiveDate, Vec<Meeting>> = BTreeMap::new();
    for meeting in meetings {
        let date = meeting.local_date(tz);
        if !exceptions.contains_key(&date) {
            by_date.entry(date).or_default().push(meeting);
        }
    }
    if from <= until {
        for (date, replacements) in exceptions.range(from..=until) {
            by_date
                .entry(*date)
                .or_default()
                .extend(replacements.iter().cloned());
        }
    }
    by_date.into_values().flat_map(|mut day| {
        day.sort_by_key(|meeting| meeting.dtstart);
        day
    })
}

// ---------------------------------------------------------------------------
// ScheduleContainer
// ---------------------------------------------------------------------------

/// Several schedules merged into one, viewed from a single timezone.
pub struct ScheduleContainer {
    pub title: String,
    timezone: Tz,
    schedules: BTreeMap<String, Box<dyn Schedule>>,
    exceptions: BTreeMap<NaiveDate, Vec<Meeting>>,
}

impl ScheduleContainer {
    #[must_use]
    pub fn new(title: impl Into<String>, timezone: Tz) -> Self {
        Self {
            title: title.into(),
            timezone,
            schedules: BTreeMap::new(),
            exceptions: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, schedule: Box<dyn Schedule>) {
        self.schedules.insert(id.into(), schedule);
    }

    pub fn remove(&mut self, id: &str) -> Option<Box<dyn Schedule>> {
        self.schedules.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Schedule> {
        self.schedules.get(id).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Replace every meeting on `date` with `meetings`.
    pub fn set_exception(&mut self, date: NaiveDate, meetings: Vec<Meeting>) {
        self.exceptions.insert(date, meetings);
    }

    pub fn remove_exception(&mut self, date: NaiveDate) -> Option<Vec<Meeting>> {
        self.exceptions.remove(&date)
    }

    /// Meetings of all schedules before exceptions, sorted by start.
    #[must_use]
    pub fn iter_original_meetings(&self, from: NaiveDate, until: NaiveDate) -> Vec<Meeting> {
        let mut meetings: Vec<Meeting> = self
            .schedules
            .values()
            .flat_map(|schedule| iter_meetings_in_tz(schedule.as_ref(), self.timezone, from, Some(until)))
            .collect();
        meetings.sort_by_key(|meeting| meeting.dtstart);
        meetings
    }
}

impl Schedule for ScheduleContainer {
    fn title(&self) -> &str {
        &self.title
    }

    fn timezone(&self) -> Tz {
        self.timezone
    }

    fn first(&self) -> Option<NaiveDate> {
        self.schedules.values().filter_map(|s| s.first()).min()
    }

    fn last(&self) -> Option<NaiveDate> {
        self.schedules.values().filter_map(|s| s.last()).max()
    }

    fn iter_meetings(&self, from: NaiveDate, until: NaiveDate) -> Box<dyn Iterator<Item = Meeting> + '_> {
        Box::new(iter_meetings_with_exceptions(
            self.iter_original_meetings(from, until),
            &self.exceptions,
            self.timezone,
            from,
            until,
        ))
    }
}

impl std::fmt::Debug for ScheduleContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleContainer")
            .field("title", &self.title)
            .field("timezone", &self.timezone)
            .field("schedules", &self.schedules.keys().collect::<Vec<_>>())
            .field("exceptions", &self.exceptions.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SelectedPeriodsSchedule
// ---------------------------------------------------------------------------

/// The meetings of a chosen subset of a timetable's periods.
#[derive(Debug, Clone)]
pub struct SelectedPeriodsSchedule {
    pub title: String,
    timetable: Arc<Timetable>,
    timezone: Tz,
    periods: BTreeSet<(String, String)>,
    /// Give back-to-back selected periods of one day a single meeting id.
    pub consecutive_periods_as_one: bool,
}

impl SelectedPeriodsSchedule {
    /// A schedule with no periods selected, in the timetable's timezone.
    #[must_use]
    pub fn new(title: impl Into<String>, timetable: Arc<Timetable>) -> Self {
        let timezone = timetable.timezone;
        Self {
            title: title.into(),
            timetable,
            timezone,
            periods: BTreeSet::new(),
            consecutive_periods_as_one: false,
        }
    }

    #[must_use]
    pub const fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    #[must_use]
    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` or `TimetableError::UnknownPeriod`
    /// when the timetable has no such period.
    pub fn add_period(&mut self, day_id: &str, period_id: &str) -> Result<(), TimetableError> {
        let day = self.timetable.day(day_id)?;
        if !day.has_period(period_id) {
            return Err(TimetableError::UnknownPeriod {
                day: day_id.to_string(),
                period: period_id.to_string(),
            });
        }
        self.periods.insert((day_id.to_string(), period_id.to_string()));
        Ok(())
    }

    pub fn remove_period(&mut self, day_id: &str, period_id: &str) -> bool {
        self.periods.remove(&(day_id.to_string(), period_id.to_string()))
    }

    #[must_use]
    pub fn has_period(&self, day_id: &str, period_id: &str) -> bool {
        self.periods.contains(&(day_id.to_string(), period_id.to_string()))
    }

    /// Selected (day id, period id) pairs.
    pub fn periods(&self) -> impl Iterator<Item = (&str, &str)> {
        self.periods.iter().map(|(day, period)| (day.as_str(), period.as_str()))
    }

    fn is_selected(&self, meeting: &Meeting) -> bool {
        match (&meeting.day_id, &meeting.period) {
            (Some(day_id), Some(period)) => self.has_period(day_id, &period.id),
            _ => false,
        }
    }

    /// True when `meeting`'s period directly follows `previous`'s in its day.
    fn follows(&self, previous: &Meeting, meeting: &Meeting) -> bool {
        let tz = self.timetable.timezone;
        if previous.local_date(tz) != meeting.local_date(tz) {
            return false;
        }
        let (Some(day_id), Some(period), Some(prev_period)) =
            (&meeting.day_id, &meeting.period, &previous.period)
        else {
            return false;
        };
        let Ok(day) = self.timetable.day(day_id) else {
            return false;
        };
        let ids: Vec<&str> = day.periods().iter().map(|p| p.id.as_str()).collect();
        ids.iter()
            .position(|id| *id == period.id)
            .and_then(|idx| idx.checked_sub(1))
            .is_some_and(|idx| ids[idx] == prev_period.id)
    }
}

impl Schedule for SelectedPeriodsSchedule {
    fn title(&self) -> &str {
        &self.title
    }

    fn timezone(&self) -> Tz {
        self.timezone
    }

    fn first(&self) -> Option<NaiveDate> {
        Some(self.timetable.term.first())
    }

    fn last(&self) -> Option<NaiveDate> {
        Some(self.timetable.term.last())
    }

    fn iter_meetings(&self, from: NaiveDate, until: NaiveDate) -> Box<dyn Iterator<Item = Meeting> + '_> {
        let mut last: Option<Meeting> = None;
        let meetings = iter_meetings_in_tz(self.timetable.as_ref(), self.timezone, from, Some(until))
            .filter(move |meeting| self.is_selected(meeting))
            .map(move |mut meeting| {
                let merged = last
                    .as_ref()
                    .filter(|prev| self.consecutive_periods_as_one && self.follows(prev, &meeting));
                if let Some(previous) = merged {
                    meeting.meeting_id.clone_from(&previous.meeting_id);
                }
                last = Some(meeting.clone());
                meeting
            });
        Box::new(meetings)
    }
}
