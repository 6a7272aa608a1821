//! TOML timetable definitions.
//!
//! ```toml
//! title = "7a"
//! timezone = "Europe/Vilnius"
//! model = "weekly"
//!
//! [term]
//! first = "2024-09-02"
//! last = "2024-12-20"
//! holidays = ["2024-11-01"]
//!
//! [[days]]
//! id = "Monday"
//! periods = ["Green", "Blue"]
//! homeroom = ["Green"]
//!
//! [[templates.default]]
//! start = "09:00"
//! minutes = 45
//!
//! [[activities]]
//! day = "Monday"
//! period = "Green"
//! title = "Math"
//! owner = "sec-math-7a"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, bail};
use bell_config::TimetableConfig;
use bell_core::{EntityKind, EntityRef};
use bell_timetable::{
    DayTemplate, DayTemplates, ModelKind, Period, Term, TimeSlot, Timetable, TimetableActivity, TimetableModel,
    TimetableSchema, TimetableSchemaDay, parse_timezone,
};
use chrono::{NaiveDate, NaiveTime, TimeDelta, Weekday};
use serde::Deserialize;
use tracing::debug;

const DEFAULT_TEMPLATE: &str = "default";

fn default_timezone() -> String {
    String::from("UTC")
}

fn school_week() -> Vec<Weekday> {
    vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
}

fn default_owner_kind() -> EntityKind {
    EntityKind::Section
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimetableDefinition {
    pub title: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub model: ModelKind,
    /// Day ids in cycle order; weekly models fall back to the configured list.
    #[serde(default)]
    pub day_ids: Vec<String>,
    pub term: TermDefinition,
    pub days: Vec<DayDefinition>,
    /// Slots keyed by weekday name, day id, or `default`.
    #[serde(default)]
    pub templates: BTreeMap<String, Vec<SlotDefinition>>,
    #[serde(default)]
    pub exception_days: Vec<ExceptionDayDefinition>,
    #[serde(default)]
    pub activities: Vec<ActivityDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermDefinition {
    #[serde(default)]
    pub title: Option<String>,
    pub first: NaiveDate,
    pub last: NaiveDate,
    #[serde(default = "school_week")]
    pub weekdays: Vec<Weekday>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DayDefinition {
    pub id: String,
    pub periods: Vec<PeriodDefinition>,
    #[serde(default)]
    pub homeroom: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PeriodDefinition {
    Plain(String),
    Typed { id: String, activity_type: String },
}

impl PeriodDefinition {
    fn to_period(&self) -> Period {
        match self {
            Self::Plain(id) => Period::from(id.as_str()),
            Self::Typed { id, activity_type } => Period::new(id.as_str(), Some(activity_type.as_str())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotDefinition {
    /// Local start time as HH:MM.
    pub start: String,
    pub minutes: i64,
    #[serde(default)]
    pub activity_type: Option<String>,
}

impl SlotDefinition {
    fn to_slot(&self) -> anyhow::Result<TimeSlot> {
        let tstart = NaiveTime::parse_from_str(&self.start, "%H:%M")
            .with_context(|| format!("invalid slot start '{}', expected HH:MM", self.start))?;
        if self.minutes <= 0 {
            bail!("slot at {} must last at least one minute", self.start);
        }
        let slot = TimeSlot::new(tstart, TimeDelta::minutes(self.minutes));
        Ok(match &self.activity_type {
            Some(kind) => slot.with_activity_type(kind.as_str()),
            None => slot,
        })
    }
}

/// Use a different day id on one date.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExceptionDayDefinition {
    pub date: NaiveDate,
    pub day_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityDefinition {
    pub day: String,
    pub period: String,
    pub title: String,
    /// Full entity id of the owner, e.g. `sec-math-7a`.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default = "default_owner_kind")]
    pub owner_kind: EntityKind,
    /// Full entity ids of booked resources.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl ActivityDefinition {
    fn to_activity(&self) -> anyhow::Result<TimetableActivity> {
        let owner = self
            .owner
            .as_deref()
            .map(|id| EntityRef::parse(self.owner_kind, id))
            .transpose()
            .with_context(|| format!("invalid owner of activity '{}'", self.title))?;
        let resources = self
            .resources
            .iter()
            .map(|id| EntityRef::parse(EntityKind::Resource, id))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("invalid resource of activity '{}'", self.title))?;
        Ok(TimetableActivity::new(self.title.as_str(), owner).with_resources(resources))
    }
}

impl TimetableDefinition {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read timetable definition {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid timetable definition {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).map_err(anyhow::Error::from)
    }

    /// Build the schema and create its timetable for the term.
    pub fn build(&self, config: &TimetableConfig) -> anyhow::Result<Timetable> {
        let timezone = parse_timezone(&self.timezone)?;
        let day_ids = self.day_ids(config);
        let mut model = TimetableModel::new(self.model, day_ids.clone(), self.templates()?)
            .with_context(|| format!("invalid {} model", self.model))?;
        for exception in &self.exception_days {
            model.set_exception_day_id(exception.date, exception.day_id.as_str())?;
        }

        let mut schema = TimetableSchema::new(self.title.as_str(), day_ids, model, timezone)?;
        for day in &self.days {
            let periods = day.periods.iter().map(PeriodDefinition::to_period).collect();
            let schema_day = TimetableSchemaDay::new(periods, day.homeroom.iter().map(String::as_str))
                .with_context(|| format!("invalid day '{}'", day.id))?;
            schema.set_day(&day.id, schema_day)?;
        }

        let mut timetable = schema.create_timetable(self.title.as_str(), self.term()?)?;
        for activity in &self.activities {
            timetable
                .add(&activity.day, &activity.period, activity.to_activity()?)
                .with_context(|| format!("cannot schedule '{}'", activity.title))?;
        }
        debug!(
            title = %self.title,
            model = %self.model,
            activities = self.activities.len(),
            "built timetable from definition"
        );
        Ok(timetable)
    }

    fn day_ids(&self, config: &TimetableConfig) -> Vec<String> {
        if self.day_ids.is_empty() && self.model == ModelKind::Weekly {
            config.weekly_day_ids.clone()
        } else if self.day_ids.is_empty() {
            self.days.iter().map(|day| day.id.clone()).collect()
        } else {
            self.day_ids.clone()
        }
    }

    fn term(&self) -> anyhow::Result<Term> {
        let title = self.term.title.as_deref().unwrap_or(&self.title);
        let mut term = Term::new(title, self.term.first, self.term.last)?;
        term.add_weekdays(&self.term.weekdays);
        for holiday in &self.term.holidays {
            term.remove(*holiday)
                .with_context(|| format!("holiday {holiday} is outside the term"))?;
        }
        Ok(term)
    }

    fn templates(&self) -> anyhow::Result<DayTemplates> {
        if self.model == ModelKind::SequentialDayIdBased {
            let mut templates = DayTemplates::by_day_id();
            for (key, slots) in &self.templates {
                templates = templates.with_day(key.as_str(), Self::template(slots)?);
            }
            return Ok(templates.into());
        }
        let mut templates = DayTemplates::by_weekday();
        for (key, slots) in &self.templates {
            let template = Self::template(slots)?;
            templates = if key == DEFAULT_TEMPLATE {
                templates.with_default(template)
            } else {
                let weekday = key
                    .parse::<Weekday>()
                    .map_err(|_| anyhow::anyhow!("template key '{key}' is not a weekday"))?;
                templates.with_weekday(weekday, template)
            };
        }
        Ok(templates.into())
    }

    fn template(slots: &[SlotDefinition]) -> anyhow::Result<DayTemplate> {
        slots.iter().map(SlotDefinition::to_slot).collect()
    }
}
