use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The day id is not declared by the schema or timetable.
    #[error("Key '{0}' not in day ids")]
    UnknownDay(String),

    /// The period id is not declared for the day.
    #[error("Key '{period}' not in periods of day '{day}'")]
    UnknownPeriod { day: String, period: String },

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("date {date} not in term [{first}, {last}]")]
    DateOutsideTerm {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("last date {last} less than first date {first}")]
    InvalidRange { first: NaiveDate, last: NaiveDate },

    /// A model has no day template for a weekday or day id.
    #[error("no day template for {0}, and no fallback either")]
    MissingDayTemplate(String),

    /// The same period id appears twice in one day.
    #[error("period '{0}' is declared more than once")]
    DuplicatePeriod(String),

    /// The same day id appears twice in a schema.
    #[error("day id '{0}' is declared more than once")]
    DuplicateDay(String),

    /// A homeroom period is not one of the day's periods.
    #[error("homeroom period '{0}' is not a period of the day")]
    InvalidHomeroom(String),

    /// Two timetables (or a timetable and a schema) are not built alike.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("timetable schema '{0}' does not exist")]
    UnknownSchema(String),
}
