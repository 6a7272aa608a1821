//! Standard school relationship vocabulary.

use bell_core::Uri;

use crate::rel_type::RelationshipType;
use crate::schema::{RelationshipProperty, RelationshipSchema};

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

pub const URI_MEMBERSHIP: Uri = Uri::from_static(
    "http://schooltool.org/ns/membership",
    "Membership",
    "The membership of a person or a group in another group.",
);
pub const URI_GROUP: Uri = Uri::from_static(
    "http://schooltool.org/ns/membership/group",
    "Group",
    "A role of a containing group.",
);
pub const URI_MEMBER: Uri = Uri::from_static(
    "http://schooltool.org/ns/membership/member",
    "Member",
    "A group member role.",
);

pub const MEMBERSHIP_TYPE: RelationshipType = RelationshipType::new(URI_MEMBERSHIP);

pub static MEMBERSHIP: RelationshipSchema =
    RelationshipSchema::new(MEMBERSHIP_TYPE, ("member", URI_MEMBER), ("group", URI_GROUP));

/// Groups a person (or group) belongs to.
pub static PERSON_GROUPS: RelationshipProperty =
    RelationshipProperty::new(MEMBERSHIP_TYPE, URI_MEMBER, URI_GROUP);

/// Members of a group.
pub static GROUP_MEMBERS: RelationshipProperty =
    RelationshipProperty::new(MEMBERSHIP_TYPE, URI_GROUP, URI_MEMBER);

// ---------------------------------------------------------------------------
// Instruction
// ---------------------------------------------------------------------------

pub const URI_INSTRUCTION: Uri = Uri::from_static(
    "http://schooltool.org/ns/instruction",
    "Instruction",
    "The relationship between an instructor and a section.",
);
pub const URI_SECTION: Uri = Uri::from_static(
    "http://schooltool.org/ns/instruction/section",
    "Section",
    "A section that is instructed.",
);
pub const URI_INSTRUCTOR: Uri = Uri::from_static(
    "http://schooltool.org/ns/instruction/instructor",
    "Instructor",
    "An instructor of a section.",
);

pub const INSTRUCTION_TYPE: RelationshipType = RelationshipType::temporal(URI_INSTRUCTION);

pub static INSTRUCTION: RelationshipSchema = RelationshipSchema::new(
    INSTRUCTION_TYPE,
    ("instructor", URI_INSTRUCTOR),
    ("section", URI_SECTION),
);

pub static SECTION_INSTRUCTORS: RelationshipProperty =
    RelationshipProperty::new(INSTRUCTION_TYPE, URI_SECTION, URI_INSTRUCTOR);

pub static INSTRUCTOR_SECTIONS: RelationshipProperty =
    RelationshipProperty::new(INSTRUCTION_TYPE, URI_INSTRUCTOR, URI_SECTION);

// ---------------------------------------------------------------------------
// CourseSections
// ---------------------------------------------------------------------------

pub const URI_COURSE_SECTIONS: Uri = Uri::from_static(
    "http://schooltool.org/ns/coursesections",
    "Course Sections",
    "A course and the sections that teach it.",
);
pub const URI_COURSE: Uri = Uri::from_static(
    "http://schooltool.org/ns/coursesections/course",
    "Course",
    "A course taught by a section.",
);
pub const URI_SECTION_OF_COURSE: Uri = Uri::from_static(
    "http://schooltool.org/ns/coursesections/section",
    "Section",
    "A section teaching a course.",
);

pub const COURSE_SECTIONS_TYPE: RelationshipType = RelationshipType::new(URI_COURSE_SECTIONS);

pub static COURSE_SECTIONS: RelationshipSchema = RelationshipSchema::new(
    COURSE_SECTIONS_TYPE,
    ("course", URI_COURSE),
    ("section", URI_SECTION_OF_COURSE),
);

// ---------------------------------------------------------------------------
// Leadership
// ---------------------------------------------------------------------------

pub const URI_LEADERSHIP: Uri = Uri::from_static(
    "http://schooltool.org/ns/leadership",
    "Leadership",
    "The leadership of an asset.",
);
pub const URI_LEADER: Uri = Uri::from_static(
    "http://schooltool.org/ns/leadership/leader",
    "Leader",
    "A leader of an asset.",
);
pub const URI_ASSET: Uri = Uri::from_static(
    "http://schooltool.org/ns/leadership/asset",
    "Asset",
    "An asset that is led.",
);

pub const LEADERSHIP_TYPE: RelationshipType = RelationshipType::temporal(URI_LEADERSHIP);

pub static LEADERSHIP: RelationshipSchema =
    RelationshipSchema::new(LEADERSHIP_TYPE, ("leader", URI_LEADER), ("asset", URI_ASSET));

// ---------------------------------------------------------------------------
// Advising
// ---------------------------------------------------------------------------

pub const URI_ADVISING: Uri = Uri::from_static(
    "http://schooltool.org/ns/advising",
    "Advising",
    "Advisors of a student.",
);
pub const URI_ADVISOR: Uri = Uri::from_static(
    "http://schooltool.org/ns/advising/advisor",
    "Advisor",
    "An advisor of a student.",
);
pub const URI_STUDENT: Uri = Uri::from_static(
    "http://schooltool.org/ns/advising/student",
    "Student",
    "A student being advised.",
);

pub const ADVISING_TYPE: RelationshipType = RelationshipType::temporal(URI_ADVISING);

pub static ADVISING: RelationshipSchema =
    RelationshipSchema::new(ADVISING_TYPE, ("advisor", URI_ADVISOR), ("student", URI_STUDENT));

// ---------------------------------------------------------------------------
// SectionBooking
// ---------------------------------------------------------------------------

pub const URI_SECTION_BOOKING: Uri = Uri::from_static(
    "http://schooltool.org/ns/sectionbooking",
    "Section Booking",
    "Resources booked for a section.",
);
pub const URI_BOOKING_SECTION: Uri = Uri::from_static(
    "http://schooltool.org/ns/sectionbooking/section",
    "Section",
    "A section that booked a resource.",
);
pub const URI_BOOKED_RESOURCE: Uri = Uri::from_static(
    "http://schooltool.org/ns/sectionbooking/resource",
    "Resource",
    "A resource booked by a section.",
);

pub const SECTION_BOOKING_TYPE: RelationshipType = RelationshipType::new(URI_SECTION_BOOKING);

pub static SECTION_BOOKING: RelationshipSchema = RelationshipSchema::new(
    SECTION_BOOKING_TYPE,
    ("section", URI_BOOKING_SECTION),
    ("resource", URI_BOOKED_RESOURCE),
);
