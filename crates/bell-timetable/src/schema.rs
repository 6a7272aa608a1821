//! Timetable schemas: the shape a timetable is created from.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TimetableError;
use crate::model::{DayPeriods, TimetableModel};
use crate::term::Term;
use crate::timetable::{Timetable, TimetableDay};

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// A named period within a timetable day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
}

impl Period {
    #[must_use]
    pub fn new(id: impl Into<String>, activity_type: Option<&str>) -> Self {
        Self {
            id: id.into(),
            activity_type: activity_type.map(str::to_string),
        }
    }
}

impl From<&str> for Period {
    fn from(id: &str) -> Self {
        Self::new(id, None)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

// ---------------------------------------------------------------------------
// TimetableSchemaDay
// ---------------------------------------------------------------------------

/// The ordered periods of a day and which of them are homeroom periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSchemaDay {
    periods: Vec<Period>,
    homeroom: Vec<String>,
}

impl TimetableSchemaDay {
    /// # Errors
    ///
    /// Returns `TimetableError::DuplicatePeriod` if two periods share an id,
    /// and `TimetableError::InvalidHomeroom` if a homeroom id is not one of
    /// `periods`.
    pub fn new<I, S>(periods: Vec<Period>, homeroom: I) -> Result<Self, TimetableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(id) = first_duplicate(periods.iter().map(|p| p.id.as_str())) {
            return Err(TimetableError::DuplicatePeriod(id.to_string()));
        }
        let mut homeroom: Vec<String> = homeroom.into_iter().map(Into::into).collect();
        if let Some(bad) = homeroom.iter().find(|id| !periods.iter().any(|p| p.id == **id)) {
            return Err(TimetableError::InvalidHomeroom(bad.clone()));
        }
        homeroom.sort();
        homeroom.dedup();
        Ok(Self { periods, homeroom })
    }

    /// A day with no homeroom periods.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::DuplicatePeriod` if two periods share an id.
    pub fn with_periods<I, P>(periods: I) -> Result<Self, TimetableError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Period>,
    {
        Self::new(periods.into_iter().map(Into::into).collect(), std::iter::empty::<String>())
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
    pub fn is_homeroom(&self, period_id: &str) -> bool {
        self.homeroom.iter().any(|id| id == period_id)
    }
}

// ---------------------------------------------------------------------------
// TimetableSchema
// ---------------------------------------------------------------------------

/// Day ids, their periods, the model that sequences them and a timezone.
#[derive(Debug, Clone)]
pub struct TimetableSchema {
    pub title: String,
    day_ids: Vec<String>,
    days: HashMap<String, TimetableSchemaDay>,
    pub model: TimetableModel,
    pub timezone: Tz,
}

impl TimetableSchema {
    /// # Errors
    ///
    /// Returns `TimetableError::DuplicateDay` if a day id is listed twice.
    pub fn new(
        title: impl Into<String>,
        day_ids: Vec<String>,
        model: TimetableModel,
        timezone: Tz,
    ) -> Result<Self, TimetableError> {
        if let Some(id) = first_duplicate(day_ids.iter().map(String::as_str)) {
            return Err(TimetableError::DuplicateDay(id.to_string()));
        }
        Ok(Self {
            title: title.into(),
            day_ids,
            days: HashMap::new(),
            model,
            timezone,
        })
    }

    #[must_use]
    pub fn day_ids(&self) -> &[String] {
        &self.day_ids
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` if `day_id` is not declared.
    pub fn set_day(&mut self, day_id: &str, day: TimetableSchemaDay) -> Result<(), TimetableError> {
        if !self.day_ids.iter().any(|id| id == day_id) {
            return Err(TimetableError::UnknownDay(day_id.to_string()));
        }
        self.days.insert(day_id.to_string(), day);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownDay` if `day_id` has no day.
    pub fn day(&self, day_id: &str) -> Result<&TimetableSchemaDay, TimetableError> {
        self.days
            .get(day_id)
            .ok_or_else(|| TimetableError::UnknownDay(day_id.to_string()))
    }

    /// Days in declaration order.
    pub fn days(&self) -> impl Iterator<Item = (&str, &TimetableSchemaDay)> {
        self.day_ids
            .iter()
            .filter_map(|id| self.days.get(id).map(|day| (id.as_str(), day)))
    }

    /// Build an empty timetable for `term`.
    ///
    /// Periods and homeroom markers are copied, as are the model and the
    /// timezone, so later changes to the schema do not reach the timetable.
    ///
    /// # Errors
    ///
    /// Returns `TimetableError::ShapeMismatch` if a day id has no day, or a
    /// day id the model uses is not declared by the schema.
    pub fn create_timetable(&self, title: impl Into<String>, term: Term) -> Result<Timetable, TimetableError> {
        if let Some(missing) = self.day_ids.iter().find(|id| !self.days.contains_key(id.as_str())) {
            return Err(TimetableError::ShapeMismatch(format!(
                "day '{missing}' of schema '{}' has no periods assigned",
                self.title
            )));
        }
        if let Some(unknown) = self.model.day_ids().iter().find(|id| !self.day_ids.contains(id)) {
            return Err(TimetableError::ShapeMismatch(format!(
                "model day id '{unknown}' is not a day of schema '{}'",
                self.title
            )));
        }
        let days = self
            .days()
            .map(|(id, day)| {
                (
                    id.to_string(),
                    TimetableDay::new(day.periods().to_vec(), day.homeroom().to_vec()),
                )
            })
            .collect();
        let timetable = Timetable::from_parts(
            title.into(),
            self.day_ids.clone(),
            days,
            self.model.clone(),
            self.timezone,
            term,
        );
        debug!(schema = %self.title, timezone = %self.timezone, days = self.day_ids.len(), "created timetable");
        Ok(timetable)
    }
}

impl DayPeriods for TimetableSchema {
    fn day_periods(&self, day_id: &str) -> Option<&[Period]> {
        self.days.get(day_id).map(TimetableSchemaDay::periods)
    }
}

/// Structural equality; the title is not part of the shape.
impl PartialEq for TimetableSchema {
    fn eq(&self, other: &Self) -> bool {
        self.day_ids == other.day_ids
            && self.days == other.days
            && self.model == other.model
            && self.timezone == other.timezone
    }
}

impl Eq for TimetableSchema {}

// ---------------------------------------------------------------------------
// TimetableSchemaContainer
// ---------------------------------------------------------------------------

/// Named schemas, one of which may be the default.
#[derive(Debug, Clone, Default)]
pub struct TimetableSchemaContainer {
    schemas: BTreeMap<String, TimetableSchema>,
    default_id: Option<String>,
}

impl TimetableSchemaContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a schema. The first schema stored becomes the default.
    pub fn insert(&mut self, id: impl Into<String>, schema: TimetableSchema) -> Option<TimetableSchema> {
        let id = id.into();
        if self.default_id.is_none() {
            self.default_id = Some(id.clone());
        }
        self.schemas.insert(id, schema)
    }

    /// Remove a schema; removing the default leaves no default.
    pub fn remove(&mut self, id: &str) -> Option<TimetableSchema> {
        if self.default_id.as_deref() == Some(id) {
            self.default_id = None;
        }
        self.schemas.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TimetableSchema> {
        self.schemas.get(id)
    }

    #[must_use]
    pub fn default_id(&self) -> Option<&str> {
        self.default_id.as_deref()
    }

    /// # Errors
    ///
    /// Returns `TimetableError::UnknownSchema` if no schema is stored as `id`.
    pub fn set_default_id(&mut self, id: Option<&str>) -> Result<(), TimetableError> {
        match id {
            Some(id) if !self.schemas.contains_key(id) => Err(TimetableError::UnknownSchema(id.to_string())),
            _ => {
                self.default_id = id.map(str::to_string);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn default_schema(&self) -> Option<&TimetableSchema> {
        self.default_id.as_deref().and_then(|id| self.schemas.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimetableSchema)> {
        self.schemas.iter().map(|(id, schema)| (id.as_str(), schema))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn first_duplicate<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}
