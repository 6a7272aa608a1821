//! Dated state log attached to a relationship edge.
//!
//! Both halves of an edge see the same log. A query for date `d` answers
//! with the latest entry on or before `d`; with no such entry the edge is
//! considered active with code `"a"`.

use bell_core::Meaning;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RelationshipError;

/// Code reported when no entry applies.
pub const DEFAULT_CODE: &str = "a";

static DEFAULT_MEANING: Meaning = Meaning::ACTIVE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub date: NaiveDate,
    pub meaning: Meaning,
    pub code: String,
}

impl StateEntry {
    #[must_use]
    pub fn new(date: NaiveDate, meaning: Meaning, code: impl Into<String>) -> Self {
        Self {
            date,
            meaning,
            code: code.into(),
        }
    }
}

/// Entries sorted by strictly increasing date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemporalState {
    entries: Vec<StateEntry>,
}

impl TemporalState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a state starting on `date`.
    ///
    /// An entry on the same date as the last one replaces it.
    ///
    /// # Errors
    ///
    /// Returns `RelationshipError::StateOutOfOrder` if `date` is before the
    /// last recorded entry.
    pub fn set(
        &mut self,
        date: NaiveDate,
        meaning: Meaning,
        code: impl Into<String>,
    ) -> Result<(), RelationshipError> {
        let entry = StateEntry::new(date, meaning, code);
        match self.entries.last_mut() {
            Some(last) if last.date > date => Err(RelationshipError::StateOutOfOrder {
                date,
                last: last.date,
            }),
            Some(last) if last.date == date => {
                *last = entry;
                Ok(())
            }
            _ => {
                self.entries.push(entry);
                Ok(())
            }
        }
    }

    /// Remove the entry recorded exactly on `date`.
    pub fn remove(&mut self, date: NaiveDate) -> Option<StateEntry> {
        let index = self.entries.iter().position(|e| e.date == date)?;
        Some(self.entries.remove(index))
    }

    /// Replace the whole log. Entries are sorted; for repeated dates the
    /// last one given wins.
    pub fn replace(&mut self, entries: impl IntoIterator<Item = StateEntry>) {
        let mut entries: Vec<StateEntry> = entries.into_iter().collect();
        entries.sort_by_key(|e| e.date);
        let mut deduped: Vec<StateEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.last_mut() {
                Some(last) if last.date == entry.date => *last = entry,
                _ => deduped.push(entry),
            }
        }
        self.entries = deduped;
    }

    /// The entry in effect on `date`.
    #[must_use]
    pub fn closest(&self, date: NaiveDate) -> Option<&StateEntry> {
        self.entries.iter().rev().find(|e| e.date <= date)
    }

    /// Meaning and code in effect on `date`, defaulting to active.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> (&Meaning, &str) {
        self.closest(date)
            .map_or((&DEFAULT_MEANING, DEFAULT_CODE), |e| (&e.meaning, e.code.as_str()))
    }

    /// True when the meaning in effect on `date` carries every flag of
    /// `meaning`.
    #[must_use]
    pub fn has(&self, date: NaiveDate, meaning: &Meaning) -> bool {
        self.get(date).0.satisfies(meaning)
    }

    #[must_use]
    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.get(date).0.is_active()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StateEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a TemporalState {
    type Item = &'a StateEntry;
    type IntoIter = std::slice::Iter<'a, StateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
