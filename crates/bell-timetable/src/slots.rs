//! Time slots and day templates.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveTime, TimeDelta, Weekday};

use crate::error::TimetableError;

/// When a period happens on a given day.
///
/// Slots order by start time, then duration. An `activity_type` pins the slot
/// to periods of the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    pub tstart: NaiveTime,
    pub duration: TimeDelta,
    pub activity_type: Option<String>,
}

impl TimeSlot {
    #[must_use]
    pub const fn new(tstart: NaiveTime, duration: TimeDelta) -> Self {
        Self {
            tstart,
            duration,
            activity_type: None,
        }
    }

    #[must_use]
    pub fn with_activity_type(mut self, activity_type: impl Into<String>) -> Self {
        self.activity_type = Some(activity_type.into());
        self
    }
}

/// The time slots of one day, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTemplate {
    slots: BTreeSet<TimeSlot>,
}

impl DayTemplate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, slot: TimeSlot) {
        self.slots.insert(slot);
    }

    pub fn remove(&mut self, slot: &TimeSlot) -> bool {
        self.slots.remove(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl FromIterator<TimeSlot> for DayTemplate {
    fn from_iter<I: IntoIterator<Item = TimeSlot>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Day templates keyed by weekday (with an optional fallback) or by day id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayTemplates {
    ByWeekday {
        templates: HashMap<Weekday, DayTemplate>,
        default: Option<DayTemplate>,
    },
    ByDayId(HashMap<String, DayTemplate>),
}

impl DayTemplates {
    /// Start a set of templates keyed by weekday.
    #[must_use]
    pub fn by_weekday() -> WeekdayTemplates {
        WeekdayTemplates::default()
    }

    /// Start a set of templates keyed by day id.
    #[must_use]
    pub fn by_day_id() -> DayIdTemplates {
        DayIdTemplates::default()
    }

    /// The template used on `weekday` for day `day_id`.
    #[must_use]
    pub fn template_for(&self, weekday: Weekday, day_id: &str) -> Option<&DayTemplate> {
        match self {
            Self::ByWeekday { templates, default } => {
                templates.get(&weekday).or(default.as_ref())
            }
            Self::ByDayId(templates) => templates.get(day_id),
        }
    }

    pub(crate) fn validate_weekdays(&self) -> Result<(), TimetableError> {
        match self {
            Self::ByWeekday { templates, default } => {
                if default.is_some() {
                    return Ok(());
                }
                match WEEK.iter().find(|day| !templates.contains_key(day)) {
                    Some(day) => Err(TimetableError::MissingDayTemplate(format!("day {day}"))),
                    None => Ok(()),
                }
            }
            Self::ByDayId(_) => Err(TimetableError::ShapeMismatch(
                "model needs day templates keyed by weekday".to_string(),
            )),
        }
    }

    pub(crate) fn validate_day_ids(&self, day_ids: &[String]) -> Result<(), TimetableError> {
        match self {
            Self::ByDayId(templates) => {
                match day_ids.iter().find(|id| !templates.contains_key(id.as_str())) {
                    Some(id) => Err(TimetableError::MissingDayTemplate(format!("day id '{id}'"))),
                    None => Ok(()),
                }
            }
            Self::ByWeekday { .. } => Err(TimetableError::ShapeMismatch(
                "model needs day templates keyed by day id".to_string(),
            )),
        }
    }
}

/// Builder for [`DayTemplates::ByWeekday`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayTemplates {
    templates: HashMap<Weekday, DayTemplate>,
    default: Option<DayTemplate>,
}

impl WeekdayTemplates {
    #[must_use]
    pub fn with_weekday(mut self, weekday: Weekday, template: DayTemplate) -> Self {
        self.templates.insert(weekday, template);
        self
    }

    /// Set the fallback used for weekdays without their own template.
    #[must_use]
    pub fn with_default(mut self, template: DayTemplate) -> Self {
        self.default = Some(template);
        self
    }
}

impl From<WeekdayTemplates> for DayTemplates {
    fn from(builder: WeekdayTemplates) -> Self {
        Self::ByWeekday {
            templates: builder.templates,
            default: builder.default,
        }
    }
}

/// Builder for [`DayTemplates::ByDayId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayIdTemplates(HashMap<String, DayTemplate>);

impl DayIdTemplates {
    #[must_use]
    pub fn with_day(mut self, day_id: impl Into<String>, template: DayTemplate) -> Self {
        self.0.insert(day_id.into(), template);
        self
    }
}

impl From<DayIdTemplates> for DayTemplates {
    fn from(builder: DayIdTemplates) -> Self {
        Self::ByDayId(builder.0)
    }
}
