//! The relationship engine.
//!
//! [`RelationshipGraph`] owns every entity's [`LinkSet`], the state shared by
//! the two halves of each edge, and the registered validators and
//! observers. Mutations validate first and write second: once a call has
//! passed its checks, the writes that follow cannot fail, so callers never
//! observe half an edge.

use std::collections::HashMap;
use std::fmt;

use bell_config::RelationshipConfig;
use bell_core::{EntityId, EntityRef, Meaning, Uri};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::RelationshipError;
use crate::events::{EventPhase, RelationshipEvent, RelationshipObserver, RelationshipValidator};
use crate::link::{EdgeId, Link, LinkSet};
use crate::rel_type::RelationshipType;
use crate::schema::RelationshipInfo;
use crate::temporal::TemporalState;
use crate::validators::standard_validators;

/// One participant of an edge: the entity and the role it plays.
pub type Party<'a> = (&'a EntityRef, &'a Uri);

/// State shared by both links of an edge.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    pub extra_info: Option<Value>,
    pub state: TemporalState,
}

pub struct RelationshipGraph {
    link_sets: HashMap<EntityId, LinkSet>,
    shared: HashMap<EdgeId, SharedState>,
    validators: Vec<Box<dyn RelationshipValidator>>,
    observers: Vec<Box<dyn RelationshipObserver>>,
    next_edge: u64,
    today: NaiveDate,
}

impl fmt::Debug for RelationshipGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipGraph")
            .field("entities", &self.link_sets.len())
            .field("edges", &self.shared.len())
            .field("validators", &self.validators.iter().map(|v| v.name()).collect::<Vec<_>>())
            .field("observers", &self.observers.len())
            .field("today", &self.today)
            .finish()
    }
}

impl RelationshipGraph {
    /// An empty graph with no validators.
    ///
    /// Temporal relationship types are filtered by their state on `today`;
    /// move it with [`RelationshipGraph::set_today`].
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            link_sets: HashMap::new(),
            shared: HashMap::new(),
            validators: Vec::new(),
            observers: Vec::new(),
            next_edge: 1,
            today,
        }
    }

    /// An empty graph with the standard school validators installed.
    #[must_use]
    pub fn with_standard_validators(config: &RelationshipConfig, today: NaiveDate) -> Self {
        let mut graph = Self::new(today);
        for validator in standard_validators(config) {
            graph.add_validator(validator);
        }
        graph
    }

    pub const fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn add_validator(&mut self, validator: Box<dyn RelationshipValidator>) {
        debug!(validator = validator.name(), "registered relationship validator");
        self.validators.push(validator);
    }

    pub fn add_observer(&mut self, observer: Box<dyn RelationshipObserver>) {
        self.observers.push(observer);
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Establish a relationship between `a` and `b`.
    ///
    /// # Errors
    ///
    /// - `RelationshipError::Duplicate` if `a` already links to `b` with the
    ///   same role and type.
    /// - Whatever a validator returns to veto the edge, typically
    ///   `RelationshipError::Invalid`.
    pub fn relate(
        &mut self,
        rel_type: &RelationshipType,
        a: Party<'_>,
        b: Party<'_>,
    ) -> Result<EdgeId, RelationshipError> {
        self.relate_with(rel_type, a, b, None)
    }

    /// [`Self::relate`] with an extra-info payload stored on the edge.
    ///
    /// # Errors
    ///
    /// See [`Self::relate`].
    pub fn relate_with(
        &mut self,
        rel_type: &RelationshipType,
        (a, role_of_a): Party<'_>,
        (b, role_of_b): Party<'_>,
        extra_info: Option<Value>,
    ) -> Result<EdgeId, RelationshipError> {
        let already_linked = self.link_sets.get(&a.id).is_some_and(|links| {
            links
                .iter()
                .any(|l| l.target.id == b.id && &l.role == role_of_b && &l.rel_type == rel_type)
        });
        // The mirror half is checked too; a stray one means the sets are out
        // of sync and inserting would duplicate it.
        let mirrored = self
            .link_sets
            .get(&b.id)
            .and_then(|links| links.find(role_of_b, &a.id, role_of_a, rel_type))
            .is_some();
        if already_linked || mirrored {
            return Err(RelationshipError::Duplicate {
                entity: a.id.clone(),
                target: b.id.clone(),
                role: role_of_b.name().to_string(),
                rel_type: rel_type.uri.name().to_string(),
            });
        }

        let event = RelationshipEvent {
            phase: EventPhase::BeforeRelate,
            rel_type,
            participant1: a,
            role1: role_of_a,
            participant2: b,
            role2: role_of_b,
            extra_info: extra_info.as_ref(),
        };
        for validator in &self.validators {
            if let Err(error) = validator.before_relate(self, &event) {
                debug!(
                    validator = validator.name(),
                    rel_type = %rel_type,
                    a = %a,
                    b = %b,
                    %error,
                    "relationship vetoed"
                );
                return Err(error);
            }
        }

        let edge = EdgeId::new(self.next_edge);
        self.next_edge += 1;
        self.link_sets.entry(a.id.clone()).or_default().insert(Link::new(
            role_of_a.clone(),
            b.clone(),
            role_of_b.clone(),
            rel_type.clone(),
            edge,
        ));
        self.link_sets.entry(b.id.clone()).or_default().insert(Link::new(
            role_of_b.clone(),
            a.clone(),
            role_of_a.clone(),
            rel_type.clone(),
            edge,
        ));
        self.shared.insert(
            edge,
            SharedState {
                extra_info,
                state: TemporalState::new(),
            },
        );
        debug!(%edge, rel_type = %rel_type, a = %a, b = %b, "related");

        let event = RelationshipEvent {
            phase: EventPhase::Added,
            rel_type,
            participant1: a,
            role1: role_of_a,
            participant2: b,
            role2: role_of_b,
            extra_info: self.extra_info(edge),
        };
        for observer in &self.observers {
            observer.relationship_added(&event);
        }
        Ok(edge)
    }

    /// Break the relationship between `a` and `b`.
    ///
    /// Succeeds when only one half is present, removing that half.
    ///
    /// # Errors
    ///
    /// - `RelationshipError::NoSuchRelationship` if neither half exists.
    /// - Whatever a validator returns to veto the removal.
    pub fn unrelate(
        &mut self,
        rel_type: &RelationshipType,
        (a, role_of_a): Party<'_>,
        (b, role_of_b): Party<'_>,
    ) -> Result<(), RelationshipError> {
        let half_a = self.find_link(a, role_of_a, b, role_of_b, rel_type, None);
        // A symmetric self-loop keeps both halves in one set.
        let skip = half_a.as_ref().filter(|_| a.id == b.id).map(|(name, _)| name.as_str());
        let half_b = self.find_link(b, role_of_b, a, role_of_a, rel_type, skip);
        let edge = match (&half_a, &half_b) {
            (Some((_, edge)), _) | (None, Some((_, edge))) => *edge,
            (None, None) => {
                return Err(RelationshipError::NoSuchRelationship {
                    rel_type: rel_type.to_string(),
                    a: a.id.clone(),
                    b: b.id.clone(),
                });
            }
        };

        let event = RelationshipEvent {
            phase: EventPhase::BeforeRemove,
            rel_type,
            participant1: a,
            role1: role_of_a,
            participant2: b,
            role2: role_of_b,
            extra_info: self.extra_info(edge),
        };
        for validator in &self.validators {
            validator.before_unrelate(self, &event)?;
        }

        for (owner, half) in [(a, half_a), (b, half_b)] {
            match half {
                Some((name, _)) => {
                    let removed = self.link_sets.get_mut(&owner.id).map(|links| links.remove(&name));
                    debug_assert!(
                        matches!(removed, Some(Ok(_))),
                        "link {name} of {owner} vanished during unrelate"
                    );
                }
                None => warn!(
                    %edge,
                    owner = %owner,
                    rel_type = %rel_type,
                    "relationship half already missing; removing the other half only"
                ),
            }
        }
        let shared = self.shared.remove(&edge).unwrap_or_default();
        debug!(%edge, rel_type = %rel_type, a = %a, b = %b, "unrelated");

        let event = RelationshipEvent {
            phase: EventPhase::Removed,
            rel_type,
            participant1: a,
            role1: role_of_a,
            participant2: b,
            role2: role_of_b,
            extra_info: shared.extra_info.as_ref(),
        };
        for observer in &self.observers {
            observer.relationship_removed(&event);
        }
        Ok(())
    }

    /// Break every relationship of `entity`. Returns how many edges were
    /// removed.
    ///
    /// Not atomic: a validator vetoing one removal stops the loop with the
    /// earlier removals already done.
    ///
    /// # Errors
    ///
    /// Whatever a validator returns to veto a removal.
    pub fn unrelate_all(&mut self, entity: &EntityRef) -> Result<usize, RelationshipError> {
        let pending: Vec<(RelationshipType, Uri, EntityRef, Uri)> = self
            .link_sets
            .get(&entity.id)
            .map(|links| {
                links
                    .iter()
                    .map(|l| (l.rel_type.clone(), l.my_role.clone(), l.target.clone(), l.role.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let mut removed = 0;
        for (rel_type, my_role, target, role) in pending {
            match self.unrelate(&rel_type, (entity, &my_role), (&target, &role)) {
                Ok(()) => removed += 1,
                // A self-loop lists both halves; the second is already gone.
                Err(RelationshipError::NoSuchRelationship { .. }) => {}
                Err(error) => return Err(error),
            }
        }
        debug!(entity = %entity, removed, "unrelated all");
        Ok(removed)
    }

    /// Record a dated state on an existing edge.
    ///
    /// # Errors
    ///
    /// - `RelationshipError::NoSuchRelationship` if the edge does not exist.
    /// - `RelationshipError::StateOutOfOrder` if `date` predates the log.
    pub fn set_state(
        &mut self,
        rel_type: &RelationshipType,
        a: Party<'_>,
        b: Party<'_>,
        date: NaiveDate,
        meaning: Meaning,
        code: &str,
    ) -> Result<(), RelationshipError> {
        let edge = self
            .find_edge(rel_type, a, b)
            .ok_or_else(|| RelationshipError::NoSuchRelationship {
                rel_type: rel_type.to_string(),
                a: a.0.id.clone(),
                b: b.0.id.clone(),
            })?;
        let shared = self.shared.entry(edge).or_default();
        shared.state.set(date, meaning, code)?;
        debug!(%edge, %date, code, "relationship state recorded");
        Ok(())
    }

    /// Relate `a` and `b` as of `date`: the edge is created if missing and
    /// the state is recorded on it.
    ///
    /// # Errors
    ///
    /// See [`Self::relate`] and [`Self::set_state`].
    pub fn relate_on(
        &mut self,
        rel_type: &RelationshipType,
        a: Party<'_>,
        b: Party<'_>,
        date: NaiveDate,
        meaning: Meaning,
        code: &str,
    ) -> Result<EdgeId, RelationshipError> {
        let edge = match self.find_edge(rel_type, a, b) {
            Some(edge) => edge,
            None => self.relate(rel_type, a, b)?,
        };
        self.set_state(rel_type, a, b, date, meaning, code)?;
        Ok(edge)
    }

    /// Mark the edge between `a` and `b` inactive from `date` on. The edge
    /// itself stays, keeping its history.
    ///
    /// # Errors
    ///
    /// See [`Self::set_state`].
    pub fn unrelate_on(
        &mut self,
        rel_type: &RelationshipType,
        a: Party<'_>,
        b: Party<'_>,
        date: NaiveDate,
    ) -> Result<(), RelationshipError> {
        self.set_state(rel_type, a, b, date, Meaning::INACTIVE, "i")
    }

    /// Replace the extra info of an edge.
    ///
    /// # Errors
    ///
    /// Returns `RelationshipError::Usage` if the edge does not exist.
    pub fn set_extra_info(
        &mut self,
        edge: EdgeId,
        extra_info: Option<Value>,
    ) -> Result<(), RelationshipError> {
        let shared = self
            .shared
            .get_mut(&edge)
            .ok_or_else(|| RelationshipError::Usage(format!("{edge} does not exist")))?;
        shared.extra_info = extra_info;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Targets of the visible links of `entity` whose target plays `role`.
    #[must_use]
    pub fn get_related_objects(
        &self,
        entity: &EntityRef,
        role: &Uri,
        rel_type: Option<&RelationshipType>,
    ) -> Vec<EntityRef> {
        self.related_links(entity, role, rel_type)
            .into_iter()
            .map(|l| l.target.clone())
            .collect()
    }

    /// Visible links of `entity` whose target plays `role`.
    ///
    /// Links of temporal types are hidden unless their state on
    /// [`Self::today`] is active.
    #[must_use]
    pub fn related_links<'g>(
        &'g self,
        entity: &EntityRef,
        role: &'g Uri,
        rel_type: Option<&'g RelationshipType>,
    ) -> Vec<&'g Link> {
        self.link_sets
            .get(&entity.id)
            .map(|links| {
                links
                    .links_by_role(role, rel_type)
                    .filter(|l| self.is_visible(l))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every link of `entity` whose target plays `role`, visible or not.
    #[must_use]
    pub fn all_links<'g>(
        &'g self,
        entity: &EntityRef,
        role: &'g Uri,
        rel_type: Option<&'g RelationshipType>,
    ) -> Vec<&'g Link> {
        self.link_sets
            .get(&entity.id)
            .map(|links| links.links_by_role(role, rel_type).collect())
            .unwrap_or_default()
    }

    /// Relationship views for the visible links of `entity` whose target
    /// plays `role`.
    #[must_use]
    pub fn relationships(
        &self,
        entity: &EntityRef,
        role: &Uri,
        rel_type: Option<&RelationshipType>,
    ) -> Vec<RelationshipInfo> {
        self.related_links(entity, role, rel_type)
            .into_iter()
            .map(|link| self.info(entity, link))
            .collect()
    }

    pub(crate) fn info(&self, source: &EntityRef, link: &Link) -> RelationshipInfo {
        let shared = self.shared.get(&link.edge);
        RelationshipInfo {
            source: source.clone(),
            link: link.clone(),
            extra_info: shared.and_then(|s| s.extra_info.clone()),
            state: shared.map(|s| s.state.clone()).unwrap_or_default(),
        }
    }

    pub(crate) fn is_visible(&self, link: &Link) -> bool {
        if !link.rel_type.temporal {
            return true;
        }
        let visible = self.state(link.edge).is_none_or(|state| state.is_active(self.today));
        trace!(edge = %link.edge, today = %self.today, visible, "temporal filter");
        visible
    }

    /// The edge joining `a` and `b`, looked up from `a`'s side.
    #[must_use]
    pub fn find_edge(
        &self,
        rel_type: &RelationshipType,
        (a, role_of_a): Party<'_>,
        (b, role_of_b): Party<'_>,
    ) -> Option<EdgeId> {
        self.find_link(a, role_of_a, b, role_of_b, rel_type, None)
            .or_else(|| self.find_link(b, role_of_b, a, role_of_a, rel_type, None))
            .map(|(_, edge)| edge)
    }

    fn find_link(
        &self,
        owner: &EntityRef,
        my_role: &Uri,
        target: &EntityRef,
        role: &Uri,
        rel_type: &RelationshipType,
        skip: Option<&str>,
    ) -> Option<(String, EdgeId)> {
        self.link_sets
            .get(&owner.id)?
            .iter()
            .find(|l| {
                &l.my_role == my_role
                    && l.target.id == target.id
                    && &l.role == role
                    && &l.rel_type == rel_type
                    && skip != Some(l.name.as_str())
            })
            .map(|l| (l.name.clone(), l.edge))
    }

    /// The link set of `entity`, if it has ever been related.
    #[must_use]
    pub fn link_set(&self, entity: &EntityRef) -> Option<&LinkSet> {
        self.link_sets.get(&entity.id)
    }

    /// Direct access to an entity's links, bypassing validators and
    /// keeping no mirror in sync. Meant for repair tools.
    pub fn link_set_mut(&mut self, entity: &EntityRef) -> Option<&mut LinkSet> {
        self.link_sets.get_mut(&entity.id)
    }

    #[must_use]
    pub fn state(&self, edge: EdgeId) -> Option<&TemporalState> {
        self.shared.get(&edge).map(|s| &s.state)
    }

    pub fn state_mut(&mut self, edge: EdgeId) -> Option<&mut TemporalState> {
        self.shared.get_mut(&edge).map(|s| &mut s.state)
    }

    #[must_use]
    pub fn extra_info(&self, edge: EdgeId) -> Option<&Value> {
        self.shared.get(&edge).and_then(|s| s.extra_info.as_ref())
    }

    /// Number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.shared.len()
    }
}
