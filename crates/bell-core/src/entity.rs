//! Entity handles and the capability model.
//!
//! Relationship validators never inspect concrete domain objects. They ask
//! whether a participant provides a capability (is it a group? a resource?),
//! which is answered from the participant's [`EntityKind`].

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{
    EntityId, PREFIX_CONTACT, PREFIX_COURSE, PREFIX_GROUP, PREFIX_PERSON, PREFIX_RESOURCE,
    PREFIX_SECTION, format_id,
};

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Something an entity can be, as far as relationship rules are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Person,
    Group,
    Section,
    Course,
    Resource,
    Contact,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Group => "group",
            Self::Section => "section",
            Self::Course => "course",
            Self::Resource => "resource",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Kind of domain object.
///
/// A section is a specialised group: it provides both the `Section` and the
/// `Group` capability, so students join sections through Membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Group,
    Section,
    Course,
    Resource,
    Contact,
}

impl EntityKind {
    /// Capabilities this kind provides.
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Person => &[Capability::Person],
            Self::Group => &[Capability::Group],
            Self::Section => &[Capability::Section, Capability::Group],
            Self::Course => &[Capability::Course],
            Self::Resource => &[Capability::Resource],
            Self::Contact => &[Capability::Contact],
        }
    }

    #[must_use]
    pub fn provides(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Person => PREFIX_PERSON,
            Self::Group => PREFIX_GROUP,
            Self::Section => PREFIX_SECTION,
            Self::Course => PREFIX_COURSE,
            Self::Resource => PREFIX_RESOURCE,
            Self::Contact => PREFIX_CONTACT,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Group => "group",
            Self::Section => "section",
            Self::Course => "course",
            Self::Resource => "resource",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(Self::Person),
            "group" => Ok(Self::Group),
            "section" => Ok(Self::Section),
            "course" => Ok(Self::Course),
            "resource" => Ok(Self::Resource),
            "contact" => Ok(Self::Contact),
            other => Err(CoreError::UnknownEntityKind(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// EntityRef
// ---------------------------------------------------------------------------

/// Handle to a domain object: its identity plus its kind.
///
/// Two handles are the same participant iff their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct EntityRef {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl EntityRef {
    /// Build a handle from a kind and an id suffix; the kind's prefix is added.
    #[must_use]
    pub fn new(kind: EntityKind, suffix: &str) -> Self {
        Self {
            id: EntityId::new(format_id(kind.id_prefix(), suffix)),
            kind,
        }
    }

    /// Build a handle from a full id, checking that the prefix matches `kind`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidEntityId` if the id does not start with the
    /// kind's prefix.
    pub fn parse(kind: EntityKind, id: &str) -> Result<Self, CoreError> {
        let id = EntityId::new(id);
        if id.prefix() != Some(kind.id_prefix()) {
            return Err(CoreError::InvalidEntityId {
                kind: kind.to_string(),
                id: id.to_string(),
            });
        }
        Ok(Self { id, kind })
    }

    #[must_use]
    pub fn person(suffix: &str) -> Self {
        Self::new(EntityKind::Person, suffix)
    }

    #[must_use]
    pub fn group(suffix: &str) -> Self {
        Self::new(EntityKind::Group, suffix)
    }

    #[must_use]
    pub fn section(suffix: &str) -> Self {
        Self::new(EntityKind::Section, suffix)
    }

    #[must_use]
    pub fn course(suffix: &str) -> Self {
        Self::new(EntityKind::Course, suffix)
    }

    #[must_use]
    pub fn resource(suffix: &str) -> Self {
        Self::new(EntityKind::Resource, suffix)
    }

    #[must_use]
    pub fn provides(&self, capability: Capability) -> bool {
        self.kind.provides(capability)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
