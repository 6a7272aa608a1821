//! Day-sequencing models.
//!
//! A model decides which timetable day id applies to a school day and which
//! time slots its periods occupy. The weekly model maps calendar weekdays
//! straight to day ids. The sequential models advance one day id per school
//! day and wrap around, so holidays do not skip a day of the cycle.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::schema::Period;
use crate::slots::{DayTemplates, TimeSlot};
use crate::term::{DateRange, Term};

// ---------------------------------------------------------------------------
// ModelKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Weekday n of the week uses day id n.
    Weekly,
    /// Cycle through day ids; time slots chosen by weekday.
    SequentialDays,
    /// Cycle through day ids; time slots chosen by day id.
    SequentialDayIdBased,
}

impl ModelKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::SequentialDays => "sequential_days",
            Self::SequentialDayIdBased => "sequential_day_id_based",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Anything that lists the periods of its days.
pub trait DayPeriods {
    fn day_periods(&self, day_id: &str) -> Option<&[Period]>;
}

/// A period with the time slot it occupies on a particular date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledPeriod {
    pub period: Period,
    pub slot: TimeSlot,
}

/// Pair periods with time slots.
///
/// Slots are taken in time order. A slot with an activity type takes the
/// first unused period of that type and is skipped when none is left; an
/// untyped slot takes the first unused period of any type.
#[must_use]
pub fn combine_templates<'a, I>(periods: &[Period], slots: I) -> Vec<(Period, TimeSlot)>
where
    I: IntoIterator<Item = &'a TimeSlot>,
{
    let mut sorted: Vec<&TimeSlot> = slots.into_iter().collect();
    sorted.sort();

    let mut queue: Vec<&Period> = periods.iter().collect();
    let mut result = Vec::new();
    for slot in sorted {
        let position = match &slot.activity_type {
            Some(wanted) => queue
                .iter()
                .position(|p| p.activity_type.as_deref() == Some(wanted.as_str())),
            None if queue.is_empty() => break,
            None => Some(0),
        };
        if let Some(position) = position {
            let period = queue.remove(position);
            result.push((period.clone(), slot.clone()));
        }
    }
    result
}

// ---------------------------------------------------------------------------
// TimetableModel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableModel {
    kind: ModelKind,
    day_ids: Vec<String>,
    templates: DayTemplates,
    exception_days: BTreeMap<NaiveDate, Vec<(String, TimeSlot)>>,
    exception_day_ids: BTreeMap<NaiveDate, String>,
}

impl TimetableModel {
    /// # Errors
    ///
    /// Returns `TimetableError::MissingDayTemplate` when a weekday (or, for
    /// the day-id based model, a day id) has no template, and
    /// `TimetableError::ShapeMismatch` when the templates are keyed the wrong
    /// way for `kind`.
    pub fn new(
        kind: ModelKind,
        day_ids: Vec<String>,
        templates: impl Into<DayTemplates>,
    ) -> Result<Self, TimetableError> {
        let templates = templates.into();
        match kind {
            ModelKind::Weekly | ModelKind::SequentialDays => templates.validate_weekdays()?,
            ModelKind::SequentialDayIdBased => templates.validate_day_ids(&day_ids)?,
        }
        Ok(Self {
            kind,
            day_ids,
            templates,
            exception_days: BTreeMap::new(),
            exception_day_ids: BTreeMap::new(),
        })
    }

    /// # Errors
    ///
    /// See [`TimetableModel::new`].
    pub fn weekly(day_ids: Vec<String>, templates: impl Into<DayTemplates>) -> Result<Self, TimetableError> {
        Self::new(ModelKind::Weekly, day_ids, templates)
    }

    /// # Errors
    ///
    /// See [`TimetableModel::new`].
    pub fn sequential_days(day_ids: Vec<String>, templates: impl Into<DayTemplates>) -> Result<Self, TimetableError> {
        Self::new(ModelKind::SequentialDays, day_ids, templates)
    }

    /// # Errors
    ///
    /// See [`TimetableModel::new`].
    pub fn sequential_day_id_based(
        day_ids: Vec<String>,
        templates: impl Into<DayTemplates>,
    ) -> Result<Self, TimetableError> {
        Self::new(ModelKind::SequentialDayIdBased, day_ids, templates)
    }

    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        self.kind
    }

    #[must_use]
    pub fn day_ids(&self) -> &[String] {
        &self.day_ids
    }

    #[must_use]
    pub const fn templates(&self) -> &DayTemplates {
        &self.templates
    }

    /// Use `day_id` on `date` instead of the one the model would pick.
    /// Sequential models do not advance their cycle on such a date.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` if `day_id` is not one of the
    /// model's day ids.
    pub fn set_exception_day_id(&mut self, date: NaiveDate, day_id: impl Into<String>) -> Result<(), TimetableError> {
        let day_id = day_id.into();
        if !self.day_ids.contains(&day_id) {
            return Err(TimetableError::UnknownDay(day_id));
        }
        self.exception_day_ids.insert(date, day_id);
        Ok(())
    }

    pub fn remove_exception_day_id(&mut self, date: NaiveDate) -> Option<String> {
        self.exception_day_ids.remove(&date)
    }

    /// Replace the period/slot pairing on `date`.
    pub fn set_exception_day(&mut self, date: NaiveDate, slots: Vec<(String, TimeSlot)>) {
        self.exception_days.insert(date, slots);
    }

    pub fn remove_exception_day(&mut self, date: NaiveDate) -> Option<Vec<(String, TimeSlot)>> {
        self.exception_days.remove(&date)
    }

    #[must_use]
    pub const fn exception_days(&self) -> &BTreeMap<NaiveDate, Vec<(String, TimeSlot)>> {
        &self.exception_days
    }

    #[must_use]
    pub const fn exception_day_ids(&self) -> &BTreeMap<NaiveDate, String> {
        &self.exception_day_ids
    }

    /// Day ids for every date of `term`, in order. Non-school days get `None`.
    #[must_use]
    pub fn day_sequence<'a>(&'a self, term: &'a Term) -> DaySequence<'a> {
        DaySequence {
            model: self,
            term,
            dates: term.range().into_iter(),
            position: 0,
        }
    }

    /// The day id in effect on `date`, `None` on a non-school day.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::DateOutsideTerm` if `date` is outside `term`.
    pub fn day_id_for(&self, term: &Term, date: NaiveDate) -> Result<Option<String>, TimetableError> {
        if !term.is_schoolday(date)? {
            return Ok(None);
        }
        if let Some(day_id) = self.exception_day_ids.get(&date) {
            return Ok(Some(day_id.clone()));
        }
        if self.kind == ModelKind::Weekly {
            return Ok(self.weekly_day_id(date).map(str::to_string));
        }
        Ok(self
            .day_sequence(term)
            .find(|(d, _)| *d == date)
            .and_then(|(_, id)| id.map(str::to_string)))
    }

    /// Periods of `date` with their time slots, honouring exception days.
    ///
    /// Returns `None` on a non-school day.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::DateOutsideTerm` if `date` is outside `term`.
    pub fn periods_in_day<D: DayPeriods + ?Sized>(
        &self,
        term: &Term,
        days: &D,
        date: NaiveDate,
    ) -> Result<Option<(String, Vec<ScheduledPeriod>)>, TimetableError> {
        self.periods_in_day_with(term, days, date, false)
    }

    /// Like [`TimetableModel::periods_in_day`] but ignoring exception days.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::DateOutsideTerm` if `date` is outside `term`.
    pub fn original_periods_in_day<D: DayPeriods + ?Sized>(
        &self,
        term: &Term,
        days: &D,
        date: NaiveDate,
    ) -> Result<Option<(String, Vec<ScheduledPeriod>)>, TimetableError> {
        self.periods_in_day_with(term, days, date, true)
    }

    fn periods_in_day_with<D: DayPeriods + ?Sized>(
        &self,
        term: &Term,
        days: &D,
        date: NaiveDate,
        original: bool,
    ) -> Result<Option<(String, Vec<ScheduledPeriod>)>, TimetableError> {
        let Some(day_id) = self.day_id_for(term, date)? else {
            return Ok(None);
        };
        let periods = self.schedule_day(days, date, &day_id, original);
        Ok(Some((day_id, periods)))
    }

    pub(crate) fn schedule_day<D: DayPeriods + ?Sized>(
        &self,
        days: &D,
        date: NaiveDate,
        day_id: &str,
        original: bool,
    ) -> Vec<ScheduledPeriod> {
        let Some(periods) = days.day_periods(day_id) else {
            return Vec::new();
        };
        let exception = if original {
            None
        } else {
            self.exception_days.get(&date)
        };
        let mut scheduled: Vec<ScheduledPeriod> = match exception {
            Some(pairs) => pairs
                .iter()
                .filter_map(|(period_id, slot)| {
                    periods.iter().find(|p| p.id == *period_id).map(|period| ScheduledPeriod {
                        period: period.clone(),
                        slot: slot.clone(),
                    })
                })
                .collect(),
            None => self
                .templates
                .template_for(date.weekday(), day_id)
                .map(|template| combine_templates(periods, template.iter()))
                .unwrap_or_default()
                .into_iter()
                .map(|(period, slot)| ScheduledPeriod { period, slot })
                .collect(),
        };
        scheduled.sort_by_key(|p| p.slot.tstart);
        scheduled
    }

    fn weekly_day_id(&self, date: NaiveDate) -> Option<&str> {
        let index = usize::try_from(date.weekday().num_days_from_monday()).ok()?;
        self.day_ids.get(index).map(String::as_str)
    }
}

/// Iterator over the dates of a term with the day id of each.
pub struct DaySequence<'a> {
    model: &'a TimetableModel,
    term: &'a Term,
    dates: <DateRange as IntoIterator>::IntoIter,
    position: usize,
}

impl<'a> Iterator for DaySequence<'a> {
    type Item = (NaiveDate, Option<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.dates.next()?;
        if !self.term.is_schoolday(date).unwrap_or(false) {
            return Some((date, None));
        }
        if let Some(day_id) = self.model.exception_day_ids.get(&date) {
            return Some((date, Some(day_id.as_str())));
        }
        let day_id = match self.model.kind {
            ModelKind::Weekly => self.model.weekly_day_id(date),
            ModelKind::SequentialDays | ModelKind::SequentialDayIdBased => {
                let ids = &self.model.day_ids;
                let id = (!ids.is_empty()).then(|| ids[self.position % ids.len()].as_str());
                self.position += 1;
                id
            }
        };
        Some((date, day_id))
    }
}

impl std::fmt::Debug for DaySequence<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaySequence")
            .field("kind", &self.model.kind)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::DayTemplate;
    use chrono::{NaiveTime, TimeDelta, Weekday};
    use pretty_assertions::assert_eq;

    fn d(day: u32) -> NaiveDate {
        // September 2003 starts on a Monday.
        NaiveDate::from_ymd_opt(2003, 9, day).unwrap()
    }

    fn t(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn weekday_term() -> Term {
        let mut term = Term::new("Autumn", d(1), d(14)).unwrap();
        term.add_weekdays(&[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]);
        term
    }

    fn two_slots() -> DayTemplates {
        let template: DayTemplate = [
            TimeSlot::new(t(9), TimeDelta::minutes(45)),
            TimeSlot::new(t(10), TimeDelta::minutes(45)),
        ]
        .into_iter()
        .collect();
        DayTemplates::by_weekday().with_default(template).into()
    }

    struct Days(Vec<(String, Vec<Period>)>);

    impl DayPeriods for Days {
        fn day_periods(&self, day_id: &str) -> Option<&[Period]> {
            self.0.iter().find(|(id, _)| id == day_id).map(|(_, p)| p.as_slice())
        }
    }

    #[test]
    fn weekly_model_maps_weekdays() {
        let model = TimetableModel::weekly(ids(&["Mon", "Tue", "Wed", "Thu", "Fri"]), two_slots()).unwrap();
        let term = weekday_term();
        assert_eq!(model.day_id_for(&term, d(3)).unwrap().as_deref(), Some("Wed"));
        assert_eq!(model.day_id_for(&term, d(6)).unwrap(), None);
        assert!(model.day_id_for(&term, d(20)).is_err());
    }

    #[test]
    fn weekly_model_without_a_day_id_for_saturday() {
        let model = TimetableModel::weekly(ids(&["Mon", "Tue", "Wed", "Thu", "Fri"]), two_slots()).unwrap();
        let mut term = weekday_term();
        term.add(d(6)).unwrap();
        assert_eq!(model.day_id_for(&term, d(6)).unwrap(), None);
    }

    #[test]
    fn sequential_model_skips_holidays() {
        let model = TimetableModel::sequential_days(ids(&["A", "B", "C"]), two_slots()).unwrap();
        let mut term = weekday_term();
        term.remove(d(2)).unwrap();
        let days: Vec<(NaiveDate, Option<&str>)> = model.day_sequence(&term).take(5).collect();
        assert_eq!(
            days,
            vec![
                (d(1), Some("A")),
                (d(2), None),
                (d(3), Some("B")),
                (d(4), Some("C")),
                (d(5), Some("A")),
            ]
        );
        assert_eq!(model.day_id_for(&term, d(8)).unwrap().as_deref(), Some("B"));
    }

    #[test]
    fn exception_day_id_does_not_advance_the_cycle() {
        let mut model = TimetableModel::sequential_days(ids(&["A", "B"]), two_slots()).unwrap();
        model.set_exception_day_id(d(2), "A").unwrap();
        let term = weekday_term();
        let days: Vec<Option<&str>> = model.day_sequence(&term).take(3).map(|(_, id)| id).collect();
        assert_eq!(days, vec![Some("A"), Some("A"), Some("B")]);
        assert!(matches!(
            model.set_exception_day_id(d(3), "Z"),
            Err(TimetableError::UnknownDay(_))
        ));
    }

    #[test]
    fn day_id_based_model_needs_every_template() {
        let templates = DayTemplates::by_day_id().with_day("A", DayTemplate::new());
        let err = TimetableModel::sequential_day_id_based(ids(&["A", "B"]), templates).unwrap_err();
        assert!(matches!(err, TimetableError::MissingDayTemplate(_)));
        assert!(TimetableModel::weekly(ids(&["A"]), DayTemplates::by_day_id()).is_err());
    }

    #[test]
    fn periods_pair_with_slots_in_time_order() {
        let model = TimetableModel::weekly(ids(&["Mon", "Tue", "Wed", "Thu", "Fri"]), two_slots()).unwrap();
        let days = Days(vec![("Mon".into(), vec![Period::from("Green"), Period::from("Blue")])]);
        let (day_id, periods) = model.periods_in_day(&weekday_term(), &days, d(1)).unwrap().unwrap();
        assert_eq!(day_id, "Mon");
        let pairs: Vec<(&str, NaiveTime)> = periods.iter().map(|p| (p.period.id.as_str(), p.slot.tstart)).collect();
        assert_eq!(pairs, vec![("Green", t(9)), ("Blue", t(10))]);
    }

    #[test]
    fn exception_days_override_slots() {
        let mut model = TimetableModel::weekly(ids(&["Mon", "Tue", "Wed", "Thu", "Fri"]), two_slots()).unwrap();
        model.set_exception_day(
            d(1),
            vec![
                ("Blue".into(), TimeSlot::new(t(8), TimeDelta::minutes(30))),
                ("Gone".into(), TimeSlot::new(t(11), TimeDelta::minutes(30))),
            ],
        );
        let days = Days(vec![("Mon".into(), vec![Period::from("Green"), Period::from("Blue")])]);
        let term = weekday_term();

        let (_, periods) = model.periods_in_day(&term, &days, d(1)).unwrap().unwrap();
        let ids: Vec<&str> = periods.iter().map(|p| p.period.id.as_str()).collect();
        assert_eq!(ids, vec!["Blue"]);

        let (_, original) = model.original_periods_in_day(&term, &days, d(1)).unwrap().unwrap();
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn typed_slots_take_periods_of_their_type() {
        let periods = vec![
            Period::from("Math"),
            Period::new("Lunch", Some("lunch")),
            Period::from("Art"),
        ];
        let slots = [
            TimeSlot::new(t(9), TimeDelta::hours(1)),
            TimeSlot::new(t(12), TimeDelta::hours(1)).with_activity_type("lunch"),
            TimeSlot::new(t(13), TimeDelta::hours(1)),
            TimeSlot::new(t(15), TimeDelta::hours(1)).with_activity_type("assembly"),
        ];
        let pairs: Vec<(String, NaiveTime)> = combine_templates(&periods, slots.iter())
            .into_iter()
            .map(|(period, slot)| (period.id, slot.tstart))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Math".to_string(), t(9)),
                ("Lunch".to_string(), t(12)),
                ("Art".to_string(), t(13)),
            ]
        );
    }
}
