//! Date ranges and terms.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::TimetableError;

/// An inclusive span of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    first: NaiveDate,
    last: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns `TimetableError::InvalidRange` if `last` is before `first`.
    pub fn new(first: NaiveDate, last: NaiveDate) -> Result<Self, TimetableError> {
        if last < first {
            return Err(TimetableError::InvalidRange { first, last });
        }
        Ok(Self { first, last })
    }

    #[must_use]
    pub const fn first(&self) -> NaiveDate {
        self.first
    }

    #[must_use]
    pub const fn last(&self) -> NaiveDate {
        self.last
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Number of dates in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from((self.last - self.first).num_days() + 1).unwrap_or(0)
    }

    /// A range always holds at least one date.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The part of this range that falls inside `other`, if any.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let first = self.first.max(other.first);
        let last = self.last.min(other.last);
        (first <= last).then_some(Self { first, last })
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.first.iter_days().take(self.len())
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = std::iter::Take<chrono::naive::NaiveDateDaysIterator>;

    fn into_iter(self) -> Self::IntoIter {
        let len = self.len();
        self.first.iter_days().take(len)
    }
}

/// A date range with the set of its school days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub title: String,
    range: DateRange,
    schooldays: BTreeSet<NaiveDate>,
}

impl Term {
    /// A term with no school days yet.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::InvalidRange` if `last` is before `first`.
    pub fn new(title: impl Into<String>, first: NaiveDate, last: NaiveDate) -> Result<Self, TimetableError> {
        Ok(Self {
            title: title.into(),
            range: DateRange::new(first, last)?,
            schooldays: BTreeSet::new(),
        })
    }

    #[must_use]
    pub const fn first(&self) -> NaiveDate {
        self.range.first
    }

    #[must_use]
    pub const fn last(&self) -> NaiveDate {
        self.range.last
    }

    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range.contains(date)
    }

    fn validate(&self, date: NaiveDate) -> Result<(), TimetableError> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(TimetableError::DateOutsideTerm {
                date,
                first: self.first(),
                last: self.last(),
            })
        }
    }

    /// # Errors
    ///
    /// Returns `TimetableError::DateOutsideTerm` for dates outside the term.
    pub fn is_schoolday(&self, date: NaiveDate) -> Result<bool, TimetableError> {
        self.validate(date)?;
        Ok(self.schooldays.contains(&date))
    }

    /// # Errors
    ///
    /// Returns `TimetableError::DateOutsideTerm` for dates outside the term.
    pub fn add(&mut self, date: NaiveDate) -> Result<(), TimetableError> {
        self.validate(date)?;
        self.schooldays.insert(date);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `TimetableError::DateOutsideTerm` for dates outside the term.
    pub fn remove(&mut self, date: NaiveDate) -> Result<(), TimetableError> {
        self.validate(date)?;
        self.schooldays.remove(&date);
        Ok(())
    }

    /// Make every date falling on one of `weekdays` a school day.
    pub fn add_weekdays(&mut self, weekdays: &[Weekday]) {
        let dates: Vec<NaiveDate> = self.on_weekdays(weekdays).collect();
        self.schooldays.extend(dates);
    }

    pub fn remove_weekdays(&mut self, weekdays: &[Weekday]) {
        let dates: Vec<NaiveDate> = self.on_weekdays(weekdays).collect();
        for date in dates {
            self.schooldays.remove(&date);
        }
    }

    /// Flip the school-day status of every date on one of `weekdays`.
    pub fn toggle_weekdays(&mut self, weekdays: &[Weekday]) {
        let dates: Vec<NaiveDate> = self.on_weekdays(weekdays).collect();
        for date in dates {
            if !self.schooldays.remove(&date) {
                self.schooldays.insert(date);
            }
        }
    }

    /// Move the term to new dates, forgetting all school days.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::InvalidRange` if `last` is before `first`;
    /// the term is left unchanged.
    pub fn reset(&mut self, first: NaiveDate, last: NaiveDate) -> Result<(), TimetableError> {
        self.range = DateRange::new(first, last)?;
        self.schooldays.clear();
        Ok(())
    }

    pub fn schooldays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.schooldays.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.range.iter()
    }

    fn on_weekdays<'a>(&self, weekdays: &'a [Weekday]) -> impl Iterator<Item = NaiveDate> + use<'a> {
        self.range
            .into_iter()
            .filter(move |date| weekdays.contains(&date.weekday()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn range_is_inclusive() {
        let january = DateRange::new(d(2003, 1, 1), d(2003, 1, 31)).unwrap();
        assert!(january.contains(d(2003, 1, 1)));
        assert!(january.contains(d(2003, 1, 31)));
        assert!(!january.contains(d(2002, 12, 31)));
        assert!(!january.contains(d(2003, 2, 1)));
        assert_eq!(january.len(), 31);
        assert_eq!(january.iter().count(), 31);
    }

    #[test]
    fn backwards_range_is_rejected() {
        assert!(matches!(
            DateRange::new(d(2003, 1, 2), d(2003, 1, 1)),
            Err(TimetableError::InvalidRange { .. })
        ));
        assert!(Term::new("Bad", d(2003, 1, 2), d(2003, 1, 1)).is_err());
    }

    #[test]
    fn weekday_operations() {
        // 2003-09-01 is a Monday.
        let mut term = Term::new("Autumn", d(2003, 9, 1), d(2003, 9, 14)).unwrap();
        term.add_weekdays(&[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]);
        assert_eq!(term.schooldays().count(), 10);
        assert!(term.is_schoolday(d(2003, 9, 1)).unwrap());
        assert!(!term.is_schoolday(d(2003, 9, 6)).unwrap());

        term.remove_weekdays(&[Weekday::Fri]);
        assert_eq!(term.schooldays().count(), 8);

        term.toggle_weekdays(&[Weekday::Fri, Weekday::Mon]);
        assert!(term.is_schoolday(d(2003, 9, 5)).unwrap());
        assert!(!term.is_schoolday(d(2003, 9, 1)).unwrap());
        assert_eq!(term.schooldays().count(), 8);
    }

    #[test]
    fn dates_outside_term_are_rejected() {
        let mut term = Term::new("Autumn", d(2003, 9, 1), d(2003, 9, 14)).unwrap();
        assert!(matches!(
            term.add(d(2003, 9, 15)),
            Err(TimetableError::DateOutsideTerm { .. })
        ));
        assert!(term.is_schoolday(d(2003, 8, 31)).is_err());
        assert!(term.remove(d(2004, 1, 1)).is_err());
    }

    #[test]
    fn reset_forgets_schooldays() {
        let mut term = Term::new("Autumn", d(2003, 9, 1), d(2003, 9, 14)).unwrap();
        term.add(d(2003, 9, 2)).unwrap();
        term.reset(d(2004, 9, 1), d(2004, 9, 30)).unwrap();
        assert_eq!(term.schooldays().count(), 0);
        assert_eq!(term.first(), d(2004, 9, 1));
        assert!(term.reset(d(2004, 9, 30), d(2004, 9, 1)).is_err());
        assert_eq!(term.last(), d(2004, 9, 30));
    }
}
