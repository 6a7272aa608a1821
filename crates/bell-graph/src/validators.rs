//! Validators for the standard relationship types.
//!
//! Each validator ignores events of other types. Messages are user-facing
//! and returned unchanged as `RelationshipError::Invalid`.

use std::collections::HashSet;

use bell_config::RelationshipConfig;
use bell_core::{Capability, EntityId, EntityRef, Uri};

use crate::error::RelationshipError;
use crate::events::{RelationshipEvent, RelationshipValidator};
use crate::graph::RelationshipGraph;
use crate::rel_type::RelationshipType;
use crate::vocabulary::{
    ADVISING_TYPE, COURSE_SECTIONS_TYPE, INSTRUCTION_TYPE, MEMBERSHIP_TYPE, SECTION_BOOKING_TYPE,
    URI_ADVISOR, URI_BOOKED_RESOURCE, URI_BOOKING_SECTION, URI_COURSE, URI_GROUP, URI_INSTRUCTOR,
    URI_MEMBER, URI_SECTION, URI_SECTION_OF_COURSE, URI_STUDENT,
};

/// Every validator for the standard vocabulary.
#[must_use]
pub fn standard_validators(config: &RelationshipConfig) -> Vec<Box<dyn RelationshipValidator>> {
    vec![
        Box::new(MembershipValidator::new(config.allow_nested_groups)),
        Box::new(InstructionValidator),
        Box::new(CourseSectionsValidator),
        Box::new(AdvisingValidator),
        Box::new(SectionBookingValidator),
    ]
}

/// Is `obj` a member of `group`, directly or through other groups?
///
/// Reflexive: every object is a transitive member of itself.
#[must_use]
pub fn is_transitive_member(graph: &RelationshipGraph, obj: &EntityRef, group: &EntityRef) -> bool {
    let mut visited: HashSet<EntityId> = HashSet::new();
    let mut stack = vec![obj.clone()];
    while let Some(current) = stack.pop() {
        if current.id == group.id {
            return true;
        }
        if !visited.insert(current.id.clone()) {
            continue;
        }
        stack.extend(
            graph
                .get_related_objects(&current, &URI_GROUP, None)
                .into_iter()
                .filter(|next| !visited.contains(&next.id)),
        );
    }
    false
}

fn concerns(event: &RelationshipEvent<'_>, rel_type: &RelationshipType) -> bool {
    event.rel_type == rel_type
}

fn require_roles(
    event: &RelationshipEvent<'_>,
    a: &Uri,
    b: &Uri,
    message: &str,
) -> Result<(), RelationshipError> {
    if event.has_roles(a, b) {
        Ok(())
    } else {
        Err(RelationshipError::invalid(message))
    }
}

fn party<'a>(event: &RelationshipEvent<'a>, role: &Uri) -> Result<&'a EntityRef, RelationshipError> {
    event
        .participant(role)
        .ok_or_else(|| RelationshipError::invalid(format!("No participant plays {}.", role.name())))
}

fn require(entity: &EntityRef, capability: Capability, message: &str) -> Result<(), RelationshipError> {
    if entity.provides(capability) {
        Ok(())
    } else {
        Err(RelationshipError::invalid(message))
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Checks, in order: the role pair, that resources stay out of groups, that
/// the group is a group, that groups are not members unless nesting is
/// allowed, and that the new edge would not close a cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipValidator {
    allow_nested_groups: bool,
}

impl MembershipValidator {
    #[must_use]
    pub const fn new(allow_nested_groups: bool) -> Self {
        Self {
            allow_nested_groups,
        }
    }
}

impl RelationshipValidator for MembershipValidator {
    fn name(&self) -> &'static str {
        "membership"
    }

    fn before_relate(
        &self,
        graph: &RelationshipGraph,
        event: &RelationshipEvent<'_>,
    ) -> Result<(), RelationshipError> {
        if !concerns(event, &MEMBERSHIP_TYPE) {
            return Ok(());
        }
        require_roles(
            event,
            &URI_MEMBER,
            &URI_GROUP,
            "Membership must have one member and one group.",
        )?;
        let member = party(event, &URI_MEMBER)?;
        let group = party(event, &URI_GROUP)?;

        if member.provides(Capability::Resource) {
            return Err(RelationshipError::invalid("Resources cannot be members of a group."));
        }
        require(group, Capability::Group, "Groups must provide IGroup.")?;
        if member.provides(Capability::Group) && !self.allow_nested_groups {
            return Err(RelationshipError::invalid("Groups cannot be members of a group anymore."));
        }
        if is_transitive_member(graph, group, member) {
            return Err(RelationshipError::invalid("No cycles are allowed."));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Instruction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionValidator;

impl RelationshipValidator for InstructionValidator {
    fn name(&self) -> &'static str {
        "instruction"
    }

    fn before_relate(
        &self,
        _graph: &RelationshipGraph,
        event: &RelationshipEvent<'_>,
    ) -> Result<(), RelationshipError> {
        if !concerns(event, &INSTRUCTION_TYPE) {
            return Ok(());
        }
        require_roles(
            event,
            &URI_INSTRUCTOR,
            &URI_SECTION,
            "Instruction must have one instructor and one section.",
        )?;
        require(party(event, &URI_SECTION)?, Capability::Section, "Sections must provide ISection.")
    }
}

// ---------------------------------------------------------------------------
// CourseSections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct CourseSectionsValidator;

impl RelationshipValidator for CourseSectionsValidator {
    fn name(&self) -> &'static str {
        "course_sections"
    }

    fn before_relate(
        &self,
        _graph: &RelationshipGraph,
        event: &RelationshipEvent<'_>,
    ) -> Result<(), RelationshipError> {
        if !concerns(event, &COURSE_SECTIONS_TYPE) {
            return Ok(());
        }
        require_roles(
            event,
            &URI_COURSE,
            &URI_SECTION_OF_COURSE,
            "CourseSections must have one course and one section.",
        )?;
        require(party(event, &URI_COURSE)?, Capability::Course, "Courses must provide ICourse.")?;
        require(
            party(event, &URI_SECTION_OF_COURSE)?,
            Capability::Section,
            "Sections must provide ISection.",
        )
    }
}

// ---------------------------------------------------------------------------
// Advising
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisingValidator;

impl RelationshipValidator for AdvisingValidator {
    fn name(&self) -> &'static str {
        "advising"
    }

    fn before_relate(
        &self,
        _graph: &RelationshipGraph,
        event: &RelationshipEvent<'_>,
    ) -> Result<(), RelationshipError> {
        if !concerns(event, &ADVISING_TYPE) {
            return Ok(());
        }
        require_roles(
            event,
            &URI_ADVISOR,
            &URI_STUDENT,
            "Advising must have one advisor and one student.",
        )?;
        require(party(event, &URI_ADVISOR)?, Capability::Person, "Advisors must be persons.")?;
        require(party(event, &URI_STUDENT)?, Capability::Person, "Students must be persons.")
    }
}

// ---------------------------------------------------------------------------
// SectionBooking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct SectionBookingValidator;

impl RelationshipValidator for SectionBookingValidator {
    fn name(&self) -> &'static str {
        "section_booking"
    }

    fn before_relate(
        &self,
        _graph: &RelationshipGraph,
        event: &RelationshipEvent<'_>,
    ) -> Result<(), RelationshipError> {
        if !concerns(event, &SECTION_BOOKING_TYPE) {
            return Ok(());
        }
        require_roles(
            event,
            &URI_BOOKING_SECTION,
            &URI_BOOKED_RESOURCE,
            "SectionBooking must have one section and one resource.",
        )?;
        require(
            party(event, &URI_BOOKING_SECTION)?,
            Capability::Section,
            "Sections must provide ISection.",
        )?;
        require(
            party(event, &URI_BOOKED_RESOURCE)?,
            Capability::Resource,
            "Only resources can be booked.",
        )
    }
}
