//! Meeting counts and day spans around daylight saving transitions.

use bell_timetable::{
    DayTemplate, DayTemplates, Period, Schedule, Term, TimeSlot, Timetable, TimetableError, TimetableModel,
    TimetableSchema, TimetableSchemaDay, Tz, date_timespan, iter_meetings_in_timezone,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use pretty_assertions::assert_eq;
use rstest::rstest;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn vilnius() -> Tz {
    "Europe/Vilnius".parse().unwrap()
}

/// A timetable with a one-hour meeting at the top of every hour, every day of 2011.
fn hourly(timezone: Tz) -> Timetable {
    let day_ids: Vec<String> = WEEK.iter().map(ToString::to_string).collect();
    let template: DayTemplate = (0..24)
        .map(|hour| TimeSlot::new(NaiveTime::from_hms_opt(hour, 0, 0).unwrap(), TimeDelta::hours(1)))
        .collect();
    let model = TimetableModel::weekly(day_ids.clone(), DayTemplates::by_weekday().with_default(template)).unwrap();

    let mut schema = TimetableSchema::new("Hourly", day_ids.clone(), model, timezone).unwrap();
    let periods: Vec<Period> = (0..24).map(|hour| Period::from(format!("H{hour:02}").as_str())).collect();
    for id in &day_ids {
        schema.set_day(id, TimetableSchemaDay::with_periods(periods.clone()).unwrap()).unwrap();
    }

    let mut term = Term::new("2011", d(2011, 1, 1), d(2011, 12, 31)).unwrap();
    term.add_weekdays(&WEEK);
    schema.create_timetable("Hourly", term).unwrap()
}

fn count(timetable: &Timetable, timezone: &str, date: NaiveDate, until: Option<NaiveDate>) -> usize {
    iter_meetings_in_timezone(timetable, timezone, date, until)
        .unwrap()
        .count()
}

#[rstest]
#[case::before_fall_back(d(2011, 10, 29), None, 24)]
#[case::fall_back(d(2011, 10, 30), None, 25)]
#[case::both_days(d(2011, 10, 29), Some(d(2011, 10, 30)), 49)]
#[case::spring_forward(d(2011, 3, 27), None, 23)]
#[case::ordinary(d(2011, 6, 15), None, 24)]
fn utc_schedule_seen_from_vilnius(#[case] date: NaiveDate, #[case] until: Option<NaiveDate>, #[case] expected: usize) {
    let timetable = hourly(chrono_tz::UTC);
    assert_eq!(count(&timetable, "Europe/Vilnius", date, until), expected);
}

#[rstest]
#[case::before_spring_forward(d(2011, 3, 26), 24)]
#[case::spring_forward(d(2011, 3, 27), 25)]
fn vilnius_schedule_seen_from_utc(#[case] date: NaiveDate, #[case] expected: usize) {
    let timetable = hourly(vilnius());
    assert_eq!(count(&timetable, "UTC", date, None), expected);
}

#[test]
fn fall_back_meetings_cover_the_long_day() {
    let timetable = hourly(chrono_tz::UTC);
    let starts: Vec<DateTime<Utc>> = iter_meetings_in_timezone(&timetable, "Europe/Vilnius", d(2011, 10, 30), None)
        .unwrap()
        .map(|meeting| meeting.dtstart)
        .collect();
    assert_eq!(starts.first(), Some(&Utc.with_ymd_and_hms(2011, 10, 29, 21, 0, 0).unwrap()));
    assert_eq!(starts.last(), Some(&Utc.with_ymd_and_hms(2011, 10, 30, 21, 0, 0).unwrap()));
    assert!(starts.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn same_timezone_returns_the_schedule_day() {
    let timetable = hourly(vilnius());
    let meetings: Vec<_> = timetable.iter_meetings(d(2011, 6, 15), d(2011, 6, 15)).collect();
    assert_eq!(meetings.len(), 24);
    assert_eq!(count(&timetable, "Europe/Vilnius", d(2011, 6, 15), None), 24);
    assert_eq!(meetings[0].meeting_id.as_deref(), Some("2011-06-15.H00"));
}

#[test]
fn dates_outside_the_term_have_no_meetings() {
    let timetable = hourly(chrono_tz::UTC);
    assert_eq!(count(&timetable, "UTC", d(2012, 1, 2), None), 0);
    assert_eq!(count(&timetable, "UTC", d(2011, 12, 31), Some(d(2012, 1, 5))), 24);
}

#[test]
fn unknown_timezone_fails_before_iterating() {
    let timetable = hourly(chrono_tz::UTC);
    let result = iter_meetings_in_timezone(&timetable, "Europe/Atlantis", d(2011, 6, 15), None);
    assert!(matches!(result, Err(TimetableError::UnknownTimezone(ref name)) if name == "Europe/Atlantis"));
}

#[rstest]
#[case::fall_back(d(2011, 10, 30), TimeDelta::hours(25))]
#[case::spring_forward(d(2011, 3, 27), TimeDelta::hours(23))]
#[case::ordinary(d(2011, 10, 31), TimeDelta::hours(24))]
fn vilnius_day_spans(#[case] date: NaiveDate, #[case] length: TimeDelta) {
    let (start, end) = date_timespan(date, vilnius());
    assert_eq!(end - start, length - TimeDelta::microseconds(1));
    assert_eq!(start.date_naive(), date);
    assert_eq!(end.date_naive(), date);
}
