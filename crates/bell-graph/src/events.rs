//! Relationship events, validators and observers.
//!
//! Every `relate` and `unrelate` goes through two phases. In the "before"
//! phase each registered [`RelationshipValidator`] sees the event and may
//! veto it by returning an error; nothing has been written yet. In the
//! "after" phase each [`RelationshipObserver`] is told what happened.

use bell_core::{EntityRef, Uri};
use serde_json::Value;

use crate::error::RelationshipError;
use crate::graph::RelationshipGraph;
use crate::rel_type::RelationshipType;
use crate::schema::RelationshipSchema;

// ---------------------------------------------------------------------------
// EventPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPhase {
    BeforeRelate,
    Added,
    BeforeRemove,
    Removed,
}

impl EventPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeRelate => "before_relate",
            Self::Added => "added",
            Self::BeforeRemove => "before_remove",
            Self::Removed => "removed",
        }
    }
}

impl std::fmt::Display for EventPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RelationshipEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct RelationshipEvent<'a> {
    pub phase: EventPhase,
    pub rel_type: &'a RelationshipType,
    pub participant1: &'a EntityRef,
    pub role1: &'a Uri,
    pub participant2: &'a EntityRef,
    pub role2: &'a Uri,
    pub extra_info: Option<&'a Value>,
}

impl<'a> RelationshipEvent<'a> {
    /// The participant playing `role`, if either does.
    #[must_use]
    pub fn participant(&self, role: &Uri) -> Option<&'a EntityRef> {
        if role == self.role1 {
            Some(self.participant1)
        } else if role == self.role2 {
            Some(self.participant2)
        } else {
            None
        }
    }

    /// True when the two roles are exactly `a` and `b`, in either order.
    #[must_use]
    pub fn has_roles(&self, a: &Uri, b: &Uri) -> bool {
        (self.role1 == a && self.role2 == b) || (self.role1 == b && self.role2 == a)
    }

    /// Resolve the event against a schema: same type and the same role pair.
    #[must_use]
    pub fn matches(&self, schema: &RelationshipSchema) -> Option<RelationshipMatch<'a>> {
        if self.rel_type != schema.rel_type() {
            return None;
        }
        let [(name_a, role_a), (name_b, role_b)] = schema.parties();
        if !self.has_roles(role_a, role_b) {
            return None;
        }
        Some(RelationshipMatch {
            parties: [
                (*name_a, self.participant(role_a)?),
                (*name_b, self.participant(role_b)?),
            ],
            extra_info: self.extra_info,
        })
    }
}

/// An event seen through a schema: participants addressed by party name.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipMatch<'a> {
    parties: [(&'static str, &'a EntityRef); 2],
    pub extra_info: Option<&'a Value>,
}

impl<'a> RelationshipMatch<'a> {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a EntityRef> {
        self.parties
            .iter()
            .find(|(party, _)| *party == name)
            .map(|(_, entity)| *entity)
    }
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// Veto hook run before a relationship is created or removed.
pub trait RelationshipValidator {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Return `RelationshipError::Invalid` to abort the relate call.
    fn before_relate(
        &self,
        _graph: &RelationshipGraph,
        _event: &RelationshipEvent<'_>,
    ) -> Result<(), RelationshipError> {
        Ok(())
    }

    /// # Errors
    ///
    /// Return an error to abort the unrelate call.
    fn before_unrelate(
        &self,
        _graph: &RelationshipGraph,
        _event: &RelationshipEvent<'_>,
    ) -> Result<(), RelationshipError> {
        Ok(())
    }
}

/// Notification hook run after a relationship was created or removed.
pub trait RelationshipObserver {
    fn relationship_added(&self, _event: &RelationshipEvent<'_>) {}

    fn relationship_removed(&self, _event: &RelationshipEvent<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{MEMBERSHIP, MEMBERSHIP_TYPE, URI_GROUP, URI_MEMBER};

    #[test]
    fn participant_by_role() {
        let pupil = EntityRef::person("jonas");
        let group = EntityRef::group("pupils");
        let event = RelationshipEvent {
            phase: EventPhase::BeforeRelate,
            rel_type: &MEMBERSHIP_TYPE,
            participant1: &pupil,
            role1: &URI_MEMBER,
            participant2: &group,
            role2: &URI_GROUP,
            extra_info: None,
        };
        assert_eq!(event.participant(&URI_MEMBER), Some(&pupil));
        assert_eq!(event.participant(&URI_GROUP), Some(&group));
        assert_eq!(event.participant(&Uri::new("example:Bogus", "Bogus")), None);
    }

    #[test]
    fn matches_schema_in_either_order() {
        let pupil = EntityRef::person("jonas");
        let group = EntityRef::group("pupils");
        let info = serde_json::json!({ "since": "2024-09-01" });
        let event = RelationshipEvent {
            phase: EventPhase::Added,
            rel_type: &MEMBERSHIP_TYPE,
            participant1: &group,
            role1: &URI_GROUP,
            participant2: &pupil,
            role2: &URI_MEMBER,
            extra_info: Some(&info),
        };
        let matched = event.matches(&MEMBERSHIP).expect("membership event");
        assert_eq!(matched.get("member"), Some(&pupil));
        assert_eq!(matched.get("group"), Some(&group));
        assert_eq!(matched.get("teacher"), None);
        assert_eq!(matched.extra_info, Some(&info));
    }

    #[test]
    fn does_not_match_other_roles() {
        let a = EntityRef::group("a");
        let b = EntityRef::group("b");
        let event = RelationshipEvent {
            phase: EventPhase::BeforeRelate,
            rel_type: &MEMBERSHIP_TYPE,
            participant1: &a,
            role1: &URI_GROUP,
            participant2: &b,
            role2: &URI_GROUP,
            extra_info: None,
        };
        assert!(event.matches(&MEMBERSHIP).is_none());
    }
}
