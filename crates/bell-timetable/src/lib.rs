//! # bell-timetable
//!
//! Timetables for SchoolBell.
//!
//! A [`TimetableSchema`] names the days of a timetable cycle and the periods
//! of each day; its [`TimetableModel`] decides which day applies to each
//! school day of a [`Term`] and when each period starts. A schema creates
//! empty [`Timetable`]s, one per term, which then hold activities.
//!
//! Timetables are [`Schedule`]s: they expand into [`Meeting`]s pinned to UTC
//! instants. [`iter_meetings_in_timezone`] lists the meetings of a date as
//! seen from any timezone, which is where daylight saving transitions make
//! a day 23 or 25 hours long.
//!
//! ```
//! use bell_timetable::{date_timespan, Tz};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2011, 10, 30).unwrap();
//! let tz: Tz = "Europe/Vilnius".parse().unwrap();
//! let (start, end) = date_timespan(date, tz);
//! assert_eq!((end - start).num_hours(), 24);
//! ```

mod error;
mod model;
mod schedule;
mod schema;
mod slots;
mod term;
mod timetable;

pub use chrono_tz::Tz;
pub use error::TimetableError;
pub use model::{DayPeriods, DaySequence, ModelKind, ScheduledPeriod, TimetableModel, combine_templates};
pub use schedule::{
    Meeting, Schedule, ScheduleContainer, SelectedPeriodsSchedule, date_timespan, iter_meetings_in_timezone,
    iter_meetings_in_tz, iter_meetings_with_exceptions, localize, parse_timezone, period_meeting_id,
};
pub use schema::{Period, TimetableSchema, TimetableSchemaContainer, TimetableSchemaDay};
pub use slots::{DayIdTemplates, DayTemplate, DayTemplates, TimeSlot, WeekdayTemplates};
pub use term::{DateRange, Term};
pub use timetable::{Timetable, TimetableActivity, TimetableDay};
