//! Links and link sets.
//!
//! A relationship between `a` and `b` is stored as two [`Link`]s: one in
//! `a`'s [`LinkSet`] pointing at `b`, one in `b`'s pointing back at `a`.
//! Both halves carry the same [`EdgeId`], which keys the state they share
//! (extra info and the temporal log).

use std::collections::HashSet;
use std::fmt;

use bell_core::{EntityId, EntityRef, Uri};
use serde::{Deserialize, Serialize};

use crate::error::RelationshipError;
use crate::rel_type::RelationshipType;

/// Identifier of one relationship edge, shared by both of its links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(u64);

impl EdgeId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge-{}", self.0)
    }
}

/// One directed half of a relationship.
///
/// `my_role` is the role of the owning entity, `role` the role of `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Name within the owning link set; assigned on insertion.
    pub name: String,
    pub my_role: Uri,
    pub target: EntityRef,
    pub role: Uri,
    pub rel_type: RelationshipType,
    pub edge: EdgeId,
}

impl Link {
    #[must_use]
    pub fn new(
        my_role: Uri,
        target: EntityRef,
        role: Uri,
        rel_type: RelationshipType,
        edge: EdgeId,
    ) -> Self {
        Self {
            name: String::new(),
            my_role,
            target,
            role,
            rel_type,
            edge,
        }
    }

    fn same_edge_shape(&self, other: &Self) -> bool {
        self.my_role == other.my_role
            && self.target.id == other.target.id
            && self.role == other.role
            && self.rel_type == other.rel_type
    }
}

/// Links owned by one entity, kept in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkSet {
    links: Vec<Link>,
}

impl LinkSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link, naming it with the smallest free positive integer.
    ///
    /// # Errors
    ///
    /// Returns `RelationshipError::DuplicateLink` if a link with the same
    /// roles, target and type is already present.
    pub fn add(&mut self, link: Link) -> Result<&Link, RelationshipError> {
        if self.links.iter().any(|l| l.same_edge_shape(&link)) {
            return Err(RelationshipError::DuplicateLink(link.target.id));
        }
        Ok(self.insert(link))
    }

    /// Insert without the duplicate check; the graph checks both halves
    /// up front.
    pub(crate) fn insert(&mut self, mut link: Link) -> &Link {
        link.name = self.free_name();
        let index = self.links.len();
        self.links.push(link);
        &self.links[index]
    }

    fn free_name(&self) -> String {
        let taken: HashSet<&str> = self.links.iter().map(|l| l.name.as_str()).collect();
        (1_u64..)
            .map(|n| n.to_string())
            .find(|name| !taken.contains(name.as_str()))
            .unwrap_or_default()
    }

    /// Remove the link called `name`.
    ///
    /// # Errors
    ///
    /// Returns `RelationshipError::LinkNotFound` if no such link exists.
    pub fn remove(&mut self, name: &str) -> Result<Link, RelationshipError> {
        let index = self
            .links
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| RelationshipError::LinkNotFound(name.to_string()))?;
        Ok(self.links.remove(index))
    }

    /// Drop every link, returning what was removed.
    pub fn clear(&mut self) -> Vec<Link> {
        std::mem::take(&mut self.links)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.name == name)
    }

    /// Find the link matching all four coordinates of an edge half.
    #[must_use]
    pub fn find(
        &self,
        my_role: &Uri,
        target: &EntityId,
        role: &Uri,
        rel_type: &RelationshipType,
    ) -> Option<&Link> {
        self.links.iter().find(|l| {
            &l.my_role == my_role && &l.target.id == target && &l.role == role && &l.rel_type == rel_type
        })
    }

    /// Links whose target plays `role`, optionally restricted to one type.
    pub fn links_by_role<'a>(
        &'a self,
        role: &'a Uri,
        rel_type: Option<&'a RelationshipType>,
    ) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |l| &l.role == role && rel_type.is_none_or(|t| &l.rel_type == t))
    }

    pub fn links_by_target<'a>(&'a self, target: &'a EntityId) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| &l.target.id == target)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}
