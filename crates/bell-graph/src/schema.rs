//! Relationship schemas and properties.
//!
//! Both are sugar over [`RelationshipGraph`]. A schema names the two ends
//! of a relationship type so callers write
//! `MEMBERSHIP.relate(&mut graph, &[("member", &pupil), ("group", &class)])`
//! instead of spelling out role URIs. A property is one end of a
//! relationship seen from a fixed entity: "the groups of this pupil".

use std::borrow::{Borrow, BorrowMut};

use bell_core::{EntityRef, Meaning, Uri};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::RelationshipError;
use crate::graph::RelationshipGraph;
use crate::link::{EdgeId, Link};
use crate::rel_type::RelationshipType;
use crate::temporal::TemporalState;

// ---------------------------------------------------------------------------
// RelationshipInfo
// ---------------------------------------------------------------------------

/// A relationship seen from one side: the source entity plus its link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipInfo {
    pub source: EntityRef,
    pub link: Link,
    pub extra_info: Option<Value>,
    pub state: TemporalState,
}

impl RelationshipInfo {
    #[must_use]
    pub const fn target(&self) -> &EntityRef {
        &self.link.target
    }

    #[must_use]
    pub const fn edge(&self) -> EdgeId {
        self.link.edge
    }
}

// ---------------------------------------------------------------------------
// RelationshipSchema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RelationshipSchema {
    rel_type: RelationshipType,
    parties: [(&'static str, Uri); 2],
}

impl RelationshipSchema {
    /// A schema whose ends are called `a.0` and `b.0`, playing roles `a.1`
    /// and `b.1`.
    #[must_use]
    pub const fn new(
        rel_type: RelationshipType,
        a: (&'static str, Uri),
        b: (&'static str, Uri),
    ) -> Self {
        Self {
            rel_type,
            parties: [a, b],
        }
    }

    #[must_use]
    pub const fn rel_type(&self) -> &RelationshipType {
        &self.rel_type
    }

    #[must_use]
    pub const fn parties(&self) -> &[(&'static str, Uri); 2] {
        &self.parties
    }

    /// Role URI of the party called `name`.
    #[must_use]
    pub fn role(&self, name: &str) -> Option<&Uri> {
        self.parties
            .iter()
            .find(|(party, _)| *party == name)
            .map(|(_, role)| role)
    }

    /// Establish a relationship.
    ///
    /// # Errors
    ///
    /// `RelationshipError::Usage` when the party names do not match the
    /// schema exactly; otherwise as [`RelationshipGraph::relate`].
    pub fn relate(
        &self,
        graph: &mut RelationshipGraph,
        parties: &[(&str, &EntityRef)],
    ) -> Result<EdgeId, RelationshipError> {
        self.relate_with(graph, parties, None)
    }

    /// [`Self::relate`] with an extra-info payload.
    ///
    /// # Errors
    ///
    /// See [`Self::relate`].
    pub fn relate_with(
        &self,
        graph: &mut RelationshipGraph,
        parties: &[(&str, &EntityRef)],
        extra_info: Option<Value>,
    ) -> Result<EdgeId, RelationshipError> {
        let [(a, role_of_a), (b, role_of_b)] = self.resolve(parties)?;
        graph.relate_with(&self.rel_type, (a, role_of_a), (b, role_of_b), extra_info)
    }

    /// Break a relationship.
    ///
    /// # Errors
    ///
    /// `RelationshipError::Usage` when the party names do not match the
    /// schema exactly; otherwise as [`RelationshipGraph::unrelate`].
    pub fn unlink(
        &self,
        graph: &mut RelationshipGraph,
        parties: &[(&str, &EntityRef)],
    ) -> Result<(), RelationshipError> {
        let [a, b] = self.resolve(parties)?;
        graph.unrelate(&self.rel_type, a, b)
    }

    /// Entities related to the given party.
    ///
    /// `MEMBERSHIP.query(&graph, ("member", &pupil))` returns the pupil's
    /// groups.
    ///
    /// # Errors
    ///
    /// `RelationshipError::Usage` if the party name is not part of the
    /// schema.
    pub fn query(
        &self,
        graph: &RelationshipGraph,
        (name, entity): (&str, &EntityRef),
    ) -> Result<Vec<EntityRef>, RelationshipError> {
        let other_role = self.other_role(name)?;
        Ok(graph.get_related_objects(entity, other_role, Some(&self.rel_type)))
    }

    /// Relationship views for the given party.
    ///
    /// # Errors
    ///
    /// `RelationshipError::Usage` if the party name is not part of the
    /// schema.
    pub fn relationships(
        &self,
        graph: &RelationshipGraph,
        (name, entity): (&str, &EntityRef),
    ) -> Result<Vec<RelationshipInfo>, RelationshipError> {
        let other_role = self.other_role(name)?;
        Ok(graph.relationships(entity, other_role, Some(&self.rel_type)))
    }

    fn other_role(&self, name: &str) -> Result<&Uri, RelationshipError> {
        let [(name_a, role_of_a), (name_b, role_of_b)] = &self.parties;
        if *name_a == name {
            Ok(role_of_b)
        } else if *name_b == name {
            Ok(role_of_a)
        } else {
            Err(RelationshipError::Usage(format!(
                "'{name}' is not a party of {}",
                self.rel_type.uri.name()
            )))
        }
    }

    fn resolve<'e>(
        &self,
        parties: &[(&str, &'e EntityRef)],
    ) -> Result<[(&'e EntityRef, &Uri); 2], RelationshipError> {
        let find = |name: &str| {
            parties
                .iter()
                .find(|(given, _)| *given == name)
                .map(|(_, entity)| *entity)
                .ok_or_else(|| RelationshipError::Usage(format!("missing a '{name}' party")))
        };
        let [(name_a, role_of_a), (name_b, role_of_b)] = &self.parties;
        let a = find(*name_a)?;
        let b = find(*name_b)?;
        if parties.len() != 2 {
            return Err(RelationshipError::Usage(format!(
                "{} takes exactly the parties '{name_a}' and '{name_b}'",
                self.rel_type.uri.name()
            )));
        }
        Ok([(a, role_of_a), (b, role_of_b)])
    }
}

// ---------------------------------------------------------------------------
// RelationshipProperty
// ---------------------------------------------------------------------------

/// One end of a relationship type, viewed from the entity playing `my_role`.
#[derive(Debug, Clone)]
pub struct RelationshipProperty {
    pub rel_type: RelationshipType,
    pub my_role: Uri,
    pub other_role: Uri,
}

impl RelationshipProperty {
    #[must_use]
    pub const fn new(rel_type: RelationshipType, my_role: Uri, other_role: Uri) -> Self {
        Self {
            rel_type,
            my_role,
            other_role,
        }
    }

    /// Bind the property to `this`. Pass `&graph` to read, `&mut graph` to
    /// also add and remove.
    #[must_use]
    pub fn bind<G>(&self, this: &EntityRef, graph: G) -> BoundRelationship<'_, G> {
        BoundRelationship {
            property: self,
            this: this.clone(),
            graph,
        }
    }
}

/// A [`RelationshipProperty`] bound to an entity and a graph.
#[derive(Debug)]
pub struct BoundRelationship<'p, G> {
    property: &'p RelationshipProperty,
    this: EntityRef,
    graph: G,
}

impl<G: Borrow<RelationshipGraph>> BoundRelationship<'_, G> {
    fn graph(&self) -> &RelationshipGraph {
        self.graph.borrow()
    }

    /// Related entities, filtered by temporal state where the type is
    /// temporal.
    #[must_use]
    pub fn iter(&self) -> std::vec::IntoIter<EntityRef> {
        self.graph()
            .get_related_objects(&self.this, &self.property.other_role, Some(&self.property.rel_type))
            .into_iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph()
            .related_links(&self.this, &self.property.other_role, Some(&self.property.rel_type))
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, other: &EntityRef) -> bool {
        let graph = self.graph();
        graph
            .related_links(&self.this, &self.property.other_role, Some(&self.property.rel_type))
            .into_iter()
            .any(|l| l.target.id == other.id && l.my_role == self.property.my_role)
    }

    #[must_use]
    pub fn relationships(&self) -> Vec<RelationshipInfo> {
        self.graph()
            .relationships(&self.this, &self.property.other_role, Some(&self.property.rel_type))
    }

    /// Related entities whose state on the graph's evaluation date carries
    /// every flag of `meaning`, whatever the default filter says.
    #[must_use]
    pub fn any(&self, meaning: &Meaning) -> Vec<EntityRef> {
        let graph = self.graph();
        let today = graph.today();
        graph
            .all_links(&self.this, &self.property.other_role, Some(&self.property.rel_type))
            .into_iter()
            .filter(|l| graph.state(l.edge).is_none_or(|s| s.has(today, meaning)))
            .map(|l| l.target.clone())
            .collect()
    }

    /// Every related entity, in any state.
    #[must_use]
    pub fn all(&self) -> Vec<EntityRef> {
        self.graph()
            .all_links(&self.this, &self.property.other_role, Some(&self.property.rel_type))
            .into_iter()
            .map(|l| l.target.clone())
            .collect()
    }

    /// The state log of the edge to `other`.
    #[must_use]
    pub fn state(&self, other: &EntityRef) -> Option<&TemporalState> {
        let graph = self.graph();
        let edge = graph.find_edge(
            &self.property.rel_type,
            (&self.this, &self.property.my_role),
            (other, &self.property.other_role),
        )?;
        graph.state(edge)
    }
}

impl<'p, G: BorrowMut<RelationshipGraph>> BoundRelationship<'p, G> {
    /// Relate `this` to `other`.
    ///
    /// # Errors
    ///
    /// As [`RelationshipGraph::relate`].
    pub fn add(
        &mut self,
        other: &EntityRef,
        extra_info: Option<Value>,
    ) -> Result<EdgeId, RelationshipError> {
        let property = self.property;
        self.graph.borrow_mut().relate_with(
            &property.rel_type,
            (&self.this, &property.my_role),
            (other, &property.other_role),
            extra_info,
        )
    }

    /// Unrelate `this` from `other`.
    ///
    /// # Errors
    ///
    /// As [`RelationshipGraph::unrelate`].
    pub fn remove(&mut self, other: &EntityRef) -> Result<(), RelationshipError> {
        let property = self.property;
        self.graph.borrow_mut().unrelate(
            &property.rel_type,
            (&self.this, &property.my_role),
            (other, &property.other_role),
        )
    }

    /// Dated changes: `bound.on(date).relate(&other, Meaning::ACTIVE, "a")`.
    pub const fn on(&mut self, date: NaiveDate) -> DatedRelationship<'_, 'p, G> {
        DatedRelationship { bound: self, date }
    }
}

/// A bound relationship with a date picked for state changes.
#[derive(Debug)]
pub struct DatedRelationship<'b, 'p, G> {
    bound: &'b mut BoundRelationship<'p, G>,
    date: NaiveDate,
}

impl<G: BorrowMut<RelationshipGraph>> DatedRelationship<'_, '_, G> {
    /// Relate `this` to `other` from this date on, creating the edge if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// As [`RelationshipGraph::relate_on`].
    pub fn relate(
        &mut self,
        other: &EntityRef,
        meaning: Meaning,
        code: &str,
    ) -> Result<EdgeId, RelationshipError> {
        let property = self.bound.property;
        self.bound.graph.borrow_mut().relate_on(
            &property.rel_type,
            (&self.bound.this, &property.my_role),
            (other, &property.other_role),
            self.date,
            meaning,
            code,
        )
    }

    /// Mark the edge to `other` inactive from this date on.
    ///
    /// # Errors
    ///
    /// As [`RelationshipGraph::unrelate_on`].
    pub fn unrelate(&mut self, other: &EntityRef) -> Result<(), RelationshipError> {
        let property = self.bound.property;
        self.bound.graph.borrow_mut().unrelate_on(
            &property.rel_type,
            (&self.bound.this, &property.my_role),
            (other, &property.other_role),
            self.date,
        )
    }
}
