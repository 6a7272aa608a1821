//! Concrete timetables: days, periods and the activities scheduled in them.

use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

use bell_core::EntityRef;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::TimetableError;
use crate::model::{DayPeriods, TimetableModel};
use crate::schedule::{Meeting, Schedule, iter_meetings_with_exceptions, localize, period_meeting_id};
use crate::schema::Period;
use crate::term::{DateRange, Term};

// ---------------------------------------------------------------------------
// TimetableActivity
// ---------------------------------------------------------------------------

/// Something scheduled in a period: a title, who runs it and what it uses.
///
/// Two activities are the same when title and owner match; resources are
/// not compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableActivity {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<EntityRef>,
}

impl TimetableActivity {
    #[must_use]
    pub fn new(title: impl Into<String>, owner: Option<EntityRef>) -> Self {
        Self {
            title: title.into(),
            owner,
            resources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_resources(mut self, resources: Vec<EntityRef>) -> Self {
        self.resources = resources;
        self
    }
}

impl PartialEq for TimetableActivity {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.owner == other.owner
    }
}

impl Eq for TimetableActivity {}

impl Hash for TimetableActivity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.owner.hash(state);
    }
}

// ---------------------------------------------------------------------------
// TimetableDay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableDay {
    periods: Vec<Period>,
    homeroom: Vec<String>,
    activities: HashMap<String, Vec<TimetableActivity>>,
}

impl TimetableDay {
    pub(crate) fn new(periods: Vec<Period>, homeroom: Vec<String>) -> Self {
        let activities = periods.iter().map(|p| (p.id.clone(), Vec::new())).collect();
        Self {
            periods,
            homeroom,
            activities,
        }
    }

    #[must_use]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    #[must_use]
    pub fn homeroom(&self) -> &[String] {
        &self.homeroom
    }

    #[must_use]
    pub fn has_period(&self, period_id: &str) -> bool {
        self.activities.contains_key(period_id)
    }

    /// Activities scheduled in `period_id`.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::UnknownPeriod` if the day has no such period.
    pub fn get(&self, period_id: &str) -> Result<&[TimetableActivity], TimetableError> {
        self.activities
            .get(period_id)
            .map(Vec::as_slice)
            .ok_or_else(|| Self::unknown(period_id))
    }

    /// Schedule `activity`. Returns false if it was already there.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::UnknownPeriod` if the day has no such period.
    pub fn add(&mut self, period_id: &str, activity: TimetableActivity) -> Result<bool, TimetableError> {
        let slot = self.slot_mut(period_id)?;
        if slot.contains(&activity) {
            return Ok(false);
        }
        slot.push(activity);
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownPeriod` if the day has no such period.
    pub fn remove(&mut self, period_id: &str, activity: &TimetableActivity) -> Result<bool, TimetableError> {
        let slot = self.slot_mut(period_id)?;
        let before = slot.len();
        slot.retain(|a| a != activity);
        Ok(slot.len() != before)
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownPeriod` if the day has no such period.
    pub fn clear(&mut self, period_id: &str) -> Result<(), TimetableError> {
        self.slot_mut(period_id)?.clear();
        Ok(())
    }

    /// (period id, activities) in period order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &[TimetableActivity])> {
        self.periods.iter().map(|p| {
            let activities = self.activities.get(&p.id).map_or(&[][..], Vec::as_slice);
            (p.id.as_str(), activities)
        })
    }

    fn slot_mut(&mut self, period_id: &str) -> Result<&mut Vec<TimetableActivity>, TimetableError> {
        self.activities
            .get_mut(period_id)
            .ok_or_else(|| Self::unknown(period_id))
    }

    fn unknown(period_id: &str) -> TimetableError {
        TimetableError::UnknownPeriod {
            day: String::new(),
            period: period_id.to_string(),
        }
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.periods == other.periods && self.homeroom == other.homeroom
    }
}

// ---------------------------------------------------------------------------
// Timetable
// ---------------------------------------------------------------------------

/// A timetable for one term, created from a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    pub title: String,
    day_ids: Vec<String>,
    days: HashMap<String, TimetableDay>,
    model: TimetableModel,
    pub timezone: Tz,
    pub term: Term,
    exceptions: BTreeMap<NaiveDate, Vec<Meeting>>,
}

impl Timetable {
    pub(crate) const fn from_parts(
        title: String,
        day_ids: Vec<String>,
        days: HashMap<String, TimetableDay>,
        model: TimetableModel,
        timezone: Tz,
        term: Term,
    ) -> Self {
        Self {
            title,
            day_ids,
            days,
            model,
            timezone,
            term,
            exceptions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn day_ids(&self) -> &[String] {
        &self.day_ids
    }

    #[must_use]
    pub const fn model(&self) -> &TimetableModel {
        &self.model
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` if `day_id` is not declared.
    pub fn day(&self, day_id: &str) -> Result<&TimetableDay, TimetableError> {
        self.days
            .get(day_id)
            .ok_or_else(|| TimetableError::UnknownDay(day_id.to_string()))
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` if `day_id` is not declared.
    pub fn day_mut(&mut self, day_id: &str) -> Result<&mut TimetableDay, TimetableError> {
        self.days
            .get_mut(day_id)
            .ok_or_else(|| TimetableError::UnknownDay(day_id.to_string()))
    }

    /// Activities in `period_id` of `day_id`.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` or `TimetableError::UnknownPeriod`.
    pub fn get(&self, day_id: &str, period_id: &str) -> Result<&[TimetableActivity], TimetableError> {
        self.day(day_id)?
            .get(period_id)
            .map_err(|err| with_day(err, day_id))
    }

    /// Schedule `activity` in `period_id` of `day_id`.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` or `TimetableError::UnknownPeriod`.
    pub fn add(&mut self, day_id: &str, period_id: &str, activity: TimetableActivity) -> Result<bool, TimetableError> {
        self.day_mut(day_id)?
            .add(period_id, activity)
            .map_err(|err| with_day(err, day_id))
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` or `TimetableError::UnknownPeriod`.
    pub fn remove(
        &mut self,
        day_id: &str,
        period_id: &str,
        activity: &TimetableActivity,
    ) -> Result<bool, TimetableError> {
        self.day_mut(day_id)?
            .remove(period_id, activity)
            .map_err(|err| with_day(err, day_id))
    }

    /// Every (day id, period id, activity), in day and period order.
    #[must_use]
    pub fn activities(&self) -> Vec<(&str, &str, &TimetableActivity)> {
        self.day_ids
            .iter()
            .filter_map(|id| self.days.get(id).map(|day| (id.as_str(), day)))
            .flat_map(|(day_id, day)| {
                day.items().flat_map(move |(period_id, activities)| {
                    activities.iter().map(move |a| (day_id, period_id, a))
                })
            })
            .collect()
    }

    /// Activities of the period a meeting came from.
    #[must_use]
    pub fn activities_for(&self, meeting: &Meeting) -> &[TimetableActivity] {
        match (&meeting.day_id, &meeting.period) {
            (Some(day_id), Some(period)) => self.get(day_id, &period.id).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// The same timetable with no activities and no exceptions.
    #[must_use]
    pub fn clone_empty(&self) -> Self {
        let days = self
            .days
            .iter()
            .map(|(id, day)| (id.clone(), TimetableDay::new(day.periods.clone(), day.homeroom.clone())))
            .collect();
        Self::from_parts(
            self.title.clone(),
            self.day_ids.clone(),
            days,
            self.model.clone(),
            self.timezone,
            self.term.clone(),
        )
    }

    /// Add every activity of `other` to this timetable.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::ShapeMismatch` if the two timetables do not
    /// share days, periods, model and timezone; nothing is added then.
    pub fn update(&mut self, other: &Self) -> Result<(), TimetableError> {
        if !self.same_shape(other) {
            return Err(TimetableError::ShapeMismatch(
                "Timetables have different schemas".to_string(),
            ));
        }
        for (day_id, period_id, activity) in other.activities() {
            self.add(day_id, period_id, activity.clone())?;
        }
        Ok(())
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.day_ids == other.day_ids
            && self.model == other.model
            && self.timezone == other.timezone
            && self.days.len() == other.days.len()
            && self
                .days
                .iter()
                .all(|(id, day)| other.days.get(id).is_some_and(|o| day.same_shape(o)))
    }

    /// Replace every meeting on `date` with `meetings`.
    pub fn set_exception(&mut self, date: NaiveDate, meetings: Vec<Meeting>) {
        self.exceptions.insert(date, meetings);
    }

    pub fn remove_exception(&mut self, date: NaiveDate) -> Option<Vec<Meeting>> {
        self.exceptions.remove(&date)
    }

    #[must_use]
    pub const fn exceptions(&self) -> &BTreeMap<NaiveDate, Vec<Meeting>> {
        &self.exceptions
    }

    /// Meetings on school days `from..=until` before meeting exceptions.
    ///
    /// Dates outside the term produce nothing.
    pub fn iter_original_meetings(&self, from: NaiveDate, until: NaiveDate) -> impl Iterator<Item = Meeting> + '_ {
        let wanted = DateRange::new(from, until)
            .ok()
            .and_then(|range| range.intersect(&self.term.range()));
        self.model
            .day_sequence(&self.term)
            .skip_while(move |(date, _)| wanted.is_none_or(|range| *date < range.first()))
            .take_while(move |(date, _)| wanted.is_some_and(|range| *date <= range.last()))
            .filter_map(|(date, day_id)| day_id.map(|id| (date, id)))
            .flat_map(move |(date, day_id)| self.meetings_on(date, day_id))
    }

    fn meetings_on(&self, date: NaiveDate, day_id: &str) -> Vec<Meeting> {
        let scheduled = self.model.schedule_day(self, date, day_id, false);
        trace!(%date, day_id, periods = scheduled.len(), "expanding day");
        scheduled
            .into_iter()
            .enumerate()
            .map(|(n, entry)| {
                let dtstart = localize(self.timezone, date.and_time(entry.slot.tstart)).with_timezone(&Utc);
                let meeting_id = period_meeting_id(date, Some(&entry.period), n + 1);
                Meeting::new(dtstart, entry.slot.duration)
                    .with_period(day_id, entry.period)
                    .with_meeting_id(meeting_id)
            })
            .collect()
    }
}

fn with_day(err: TimetableError, day_id: &str) -> TimetableError {
    match err {
        TimetableError::UnknownPeriod { period, .. } => TimetableError::UnknownPeriod {
            day: day_id.to_string(),
            period,
        },
        other => other,
    }
}

impl DayPeriods for Timetable {
    fn day_periods(&self, day_id: &str) -> Option<&[Period]> {
        self.days.get(day_id).map(TimetableDay::periods)
    }
}

impl Schedule for Timetable {
    fn title(&self) -> &str {
        &self.title
    }

    fn timezone(&self) -> Tz {
        self.timezone
    }

    fn first(&self) -> Option<NaiveDate> {
        Some(self.term.first())
    }

    fn last(&self) -> Option<NaiveDate> {
        Some(self.term.last())
    }

    fn iter_meetings(&self, from: NaiveDate, until: NaiveDate) -> Box<dyn Iterator<Item = Meeting> + '_> {
        debug!(timetable = %self.title, %from, %until, "iterating meetings");
        Box::new(iter_meetings_with_exceptions(
            self.iter_original_meetings(from, until),
            &self.exceptions,
            self.timezone,
            from,
            until,
        ))
    }
}
