//! Schemas, timetable creation and activity bookkeeping.

use bell_core::EntityRef;
use bell_timetable::{
    DayTemplate, DayTemplates, Period, Term, TimeSlot, TimetableActivity, TimetableError, TimetableModel,
    TimetableSchema, TimetableSchemaDay, Tz,
};
use chrono::{NaiveDate, NaiveTime, TimeDelta, Weekday};
use pretty_assertions::assert_eq;

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn model() -> TimetableModel {
    let template: DayTemplate = [9, 10, 11]
        .into_iter()
        .map(|hour| TimeSlot::new(NaiveTime::from_hms_opt(hour, 0, 0).unwrap(), TimeDelta::minutes(50)))
        .collect();
    TimetableModel::sequential_days(ids(&["A", "B"]), DayTemplates::by_weekday().with_default(template)).unwrap()
}

fn schema(homeroom_a: &[&str]) -> TimetableSchema {
    let mut schema = TimetableSchema::new("Two day cycle", ids(&["A", "B"]), model(), Tz::Europe__Vilnius).unwrap();
    schema
        .set_day(
            "A",
            TimetableSchemaDay::new(vec![Period::from("Green"), Period::from("Blue")], homeroom_a.iter().copied())
                .unwrap(),
        )
        .unwrap();
    schema
        .set_day(
            "B",
            TimetableSchemaDay::with_periods(["Green", "Red", "Yellow"]).unwrap(),
        )
        .unwrap();
    schema
}

fn term() -> Term {
    let mut term = Term::new("Autumn 2024", d(2024, 9, 2), d(2024, 12, 20)).unwrap();
    term.add_weekdays(&[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]);
    term
}

#[test]
fn schemas_with_the_same_days_are_equal() {
    assert_eq!(schema(&["Green"]), schema(&["Green"]));
    assert_ne!(schema(&["Green"]), schema(&["Blue"]));
    assert_ne!(schema(&["Green"]), schema(&[]));
}

#[test]
fn timetable_copies_days_and_starts_empty() {
    let schema = schema(&["Green"]);
    let timetable = schema.create_timetable("7a", term()).unwrap();

    assert_eq!(timetable.day_ids(), schema.day_ids());
    for (day_id, day) in schema.days() {
        let created = timetable.day(day_id).unwrap();
        assert_eq!(created.periods(), day.periods());
        assert_eq!(created.homeroom(), day.homeroom());
        assert!(created.items().all(|(_, activities)| activities.is_empty()));
    }
    assert!(timetable.activities().is_empty());
}

#[test]
fn later_schema_edits_do_not_reach_the_timetable() {
    let mut schema = schema(&["Green"]);
    let timetable = schema.create_timetable("7a", term()).unwrap();

    schema
        .set_day("A", TimetableSchemaDay::with_periods(["Purple"]).unwrap())
        .unwrap();
    schema.timezone = Tz::UTC;

    let periods: Vec<&str> = timetable.day("A").unwrap().periods().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(periods, vec!["Green", "Blue"]);
    assert_eq!(timetable.timezone, Tz::Europe__Vilnius);
}

#[test]
fn slots_must_be_declared() {
    let mut timetable = schema(&[]).create_timetable("7a", term()).unwrap();
    let math = TimetableActivity::new("Math", Some(EntityRef::section("math-7a")));

    let err = timetable.add("C", "Green", math.clone()).unwrap_err();
    assert_eq!(err.to_string(), "Key 'C' not in day ids");

    let err = timetable.add("A", "Red", math.clone()).unwrap_err();
    assert_eq!(err.to_string(), "Key 'Red' not in periods of day 'A'");

    assert!(timetable.add("B", "Red", math.clone()).unwrap());
    assert_eq!(timetable.get("B", "Red").unwrap(), &[math]);
}

#[test]
fn activities_are_listed_in_day_and_period_order() {
    let mut timetable = schema(&[]).create_timetable("7a", term()).unwrap();
    timetable.add("B", "Yellow", TimetableActivity::new("Art", None)).unwrap();
    timetable.add("A", "Blue", TimetableActivity::new("Math", None)).unwrap();
    timetable.add("B", "Green", TimetableActivity::new("Music", None)).unwrap();

    let listed: Vec<(&str, &str, &str)> = timetable
        .activities()
        .into_iter()
        .map(|(day, period, activity)| (day, period, activity.title.as_str()))
        .collect();
    assert_eq!(
        listed,
        vec![("A", "Blue", "Math"), ("B", "Green", "Music"), ("B", "Yellow", "Art")]
    );
}

#[test]
fn clone_empty_and_update() {
    let schema = schema(&["Green"]);
    let mut source = schema.create_timetable("7a", term()).unwrap();
    source.add("A", "Green", TimetableActivity::new("Homeroom", None)).unwrap();

    let mut target = source.clone_empty();
    assert!(target.activities().is_empty());
    assert_eq!(target.day_ids(), source.day_ids());

    target.update(&source).unwrap();
    assert_eq!(target, source);

    let mut other_schema = TimetableSchema::new("Other", ids(&["A", "B"]), model(), Tz::UTC).unwrap();
    other_schema.set_day("A", TimetableSchemaDay::with_periods(["Green"]).unwrap()).unwrap();
    other_schema.set_day("B", TimetableSchemaDay::with_periods(["Green"]).unwrap()).unwrap();
    let other = other_schema.create_timetable("7b", term()).unwrap();

    let err = target.update(&other).unwrap_err();
    assert!(matches!(err, TimetableError::ShapeMismatch(ref msg) if msg == "Timetables have different schemas"));
}

#[test]
fn model_day_ids_must_be_schema_days() {
    let model = TimetableModel::sequential_days(
        ids(&["A", "B", "C"]),
        DayTemplates::by_weekday().with_default(DayTemplate::new()),
    )
    .unwrap();
    let mut schema = TimetableSchema::new("Broken", ids(&["A", "B"]), model, Tz::UTC).unwrap();
    schema.set_day("A", TimetableSchemaDay::with_periods(["Green"]).unwrap()).unwrap();
    schema.set_day("B", TimetableSchemaDay::with_periods(["Green"]).unwrap()).unwrap();
    assert!(matches!(
        schema.create_timetable("x", term()),
        Err(TimetableError::ShapeMismatch(_))
    ));
}

#[test]
fn sequential_days_feed_the_periods_of_each_date() {
    let timetable = schema(&[]).create_timetable("7a", term()).unwrap();
    let model = timetable.model();

    // Monday 2 September is day A, Tuesday is day B, Monday 9 September is B again.
    let (day, periods) = model.periods_in_day(&timetable.term, &timetable, d(2024, 9, 3)).unwrap().unwrap();
    assert_eq!(day, "B");
    let ids: Vec<&str> = periods.iter().map(|p| p.period.id.as_str()).collect();
    assert_eq!(ids, vec!["Green", "Red", "Yellow"]);

    let (day, _) = model.periods_in_day(&timetable.term, &timetable, d(2024, 9, 9)).unwrap().unwrap();
    assert_eq!(day, "B");
    assert_eq!(model.periods_in_day(&timetable.term, &timetable, d(2024, 9, 7)).unwrap(), None);
}
