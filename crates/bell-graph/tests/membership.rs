//! Membership rules and the other standard validators.

use bell_config::RelationshipConfig;
use bell_core::EntityRef;
use bell_graph::{
    ADVISING, COURSE_SECTIONS, INSTRUCTION, MEMBERSHIP, MEMBERSHIP_TYPE, RelationshipError,
    RelationshipGraph, SECTION_BOOKING, URI_GROUP, URI_MEMBER, is_transitive_member,
};
use chrono::NaiveDate;
use rstest::rstest;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
}

fn graph(allow_nested_groups: bool) -> RelationshipGraph {
    RelationshipGraph::with_standard_validators(
        &RelationshipConfig {
            allow_nested_groups,
        },
        today(),
    )
}

fn invalid_message(result: Result<bell_graph::EdgeId, RelationshipError>) -> String {
    match result {
        Err(RelationshipError::Invalid(message)) => message,
        other => panic!("expected an invalid relationship, got {other:?}"),
    }
}

#[test]
fn person_joins_group() {
    let mut graph = graph(false);
    let jonas = EntityRef::person("jonas");
    let pupils = EntityRef::group("pupils");
    MEMBERSHIP
        .relate(&mut graph, &[("member", &jonas), ("group", &pupils)])
        .unwrap();
    assert!(is_transitive_member(&graph, &jonas, &pupils));
    assert!(!is_transitive_member(&graph, &pupils, &jonas));
}

#[test]
fn students_join_sections_as_groups() {
    let mut graph = graph(false);
    let jonas = EntityRef::person("jonas");
    let algebra = EntityRef::section("algebra-1");
    MEMBERSHIP
        .relate(&mut graph, &[("member", &jonas), ("group", &algebra)])
        .unwrap();
    assert_eq!(MEMBERSHIP.query(&graph, ("group", &algebra)).unwrap(), vec![jonas]);
}

#[rstest]
#[case(EntityRef::resource("projector"), EntityRef::group("pupils"), "Resources cannot be members of a group.")]
#[case(EntityRef::person("jonas"), EntityRef::person("petras"), "Groups must provide IGroup.")]
#[case(EntityRef::group("choir"), EntityRef::group("pupils"), "Groups cannot be members of a group anymore.")]
fn membership_rejects(#[case] member: EntityRef, #[case] group: EntityRef, #[case] message: &str) {
    let mut graph = graph(false);
    let result = MEMBERSHIP.relate(&mut graph, &[("member", &member), ("group", &group)]);
    assert_eq!(invalid_message(result), message);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn membership_requires_member_and_group_roles() {
    let mut graph = graph(false);
    let a = EntityRef::group("a");
    let b = EntityRef::group("b");
    let result = graph.relate(&MEMBERSHIP_TYPE, (&a, &URI_GROUP), (&b, &URI_GROUP));
    assert_eq!(invalid_message(result), "Membership must have one member and one group.");

    let result = graph.relate(&MEMBERSHIP_TYPE, (&a, &URI_MEMBER), (&b, &URI_MEMBER));
    assert_eq!(invalid_message(result), "Membership must have one member and one group.");
}

#[test]
fn nested_groups_are_transitive_and_acyclic() {
    let mut graph = graph(true);
    let a = EntityRef::group("a");
    let b = EntityRef::group("b");
    let c = EntityRef::group("c");
    MEMBERSHIP.relate(&mut graph, &[("member", &a), ("group", &b)]).unwrap();
    MEMBERSHIP.relate(&mut graph, &[("member", &b), ("group", &c)]).unwrap();

    assert!(is_transitive_member(&graph, &a, &c));
    assert!(is_transitive_member(&graph, &a, &a));
    assert!(!is_transitive_member(&graph, &c, &a));

    let result = MEMBERSHIP.relate(&mut graph, &[("member", &c), ("group", &a)]);
    assert_eq!(invalid_message(result), "No cycles are allowed.");
    let result = MEMBERSHIP.relate(&mut graph, &[("member", &a), ("group", &a)]);
    assert_eq!(invalid_message(result), "No cycles are allowed.");
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn transitive_member_terminates_on_existing_cycle() {
    // No validators, so a cycle can be built by hand.
    let mut graph = RelationshipGraph::new(today());
    let a = EntityRef::group("a");
    let b = EntityRef::group("b");
    let outsider = EntityRef::group("outsider");
    MEMBERSHIP.relate(&mut graph, &[("member", &a), ("group", &b)]).unwrap();
    MEMBERSHIP.relate(&mut graph, &[("member", &b), ("group", &a)]).unwrap();

    assert!(is_transitive_member(&graph, &a, &b));
    assert!(is_transitive_member(&graph, &b, &a));
    assert!(!is_transitive_member(&graph, &a, &outsider));
}

#[test]
fn instruction_needs_a_section() {
    let mut graph = graph(false);
    let teacher = EntityRef::person("teacher");
    let section = EntityRef::section("algebra-1");
    let group = EntityRef::group("staff");

    INSTRUCTION
        .relate(&mut graph, &[("instructor", &teacher), ("section", &section)])
        .unwrap();
    let result = INSTRUCTION.relate(&mut graph, &[("instructor", &teacher), ("section", &group)]);
    assert_eq!(invalid_message(result), "Sections must provide ISection.");
}

#[test]
fn course_sections_check_both_ends() {
    let mut graph = graph(false);
    let course = EntityRef::course("algebra");
    let section = EntityRef::section("algebra-1");
    COURSE_SECTIONS
        .relate(&mut graph, &[("course", &course), ("section", &section)])
        .unwrap();

    let result = COURSE_SECTIONS.relate(
        &mut graph,
        &[("course", &EntityRef::group("algebra")), ("section", &section)],
    );
    assert_eq!(invalid_message(result), "Courses must provide ICourse.");

    let result = COURSE_SECTIONS.relate(
        &mut graph,
        &[("course", &course), ("section", &EntityRef::group("algebra-2"))],
    );
    assert_eq!(invalid_message(result), "Sections must provide ISection.");
}

#[test]
fn advising_is_between_persons() {
    let mut graph = graph(false);
    let advisor = EntityRef::person("advisor");
    let student = EntityRef::person("student");
    ADVISING
        .relate(&mut graph, &[("advisor", &advisor), ("student", &student)])
        .unwrap();

    let result = ADVISING.relate(
        &mut graph,
        &[("advisor", &EntityRef::group("office")), ("student", &student)],
    );
    assert_eq!(invalid_message(result), "Advisors must be persons.");
}

#[test]
fn only_resources_are_booked() {
    let mut graph = graph(false);
    let section = EntityRef::section("algebra-1");
    SECTION_BOOKING
        .relate(&mut graph, &[("section", &section), ("resource", &EntityRef::resource("room-101"))])
        .unwrap();

    let result = SECTION_BOOKING.relate(
        &mut graph,
        &[("section", &section), ("resource", &EntityRef::person("janitor"))],
    );
    assert_eq!(invalid_message(result), "Only resources can be booked.");
}
