//! Relationship types.

use std::fmt;
use std::hash::{Hash, Hasher};

use bell_core::Uri;
use serde::{Deserialize, Serialize};

/// A kind of relationship, identified by its URI.
///
/// Temporal types keep a dated state log on every edge and hide links whose
/// state on the graph's evaluation date is not active. Plain types never
/// filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipType {
    pub uri: Uri,
    #[serde(default)]
    pub temporal: bool,
}

impl RelationshipType {
    #[must_use]
    pub const fn new(uri: Uri) -> Self {
        Self {
            uri,
            temporal: false,
        }
    }

    #[must_use]
    pub const fn temporal(uri: Uri) -> Self {
        Self {
            uri,
            temporal: true,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.uri.as_str()
    }
}

impl PartialEq for RelationshipType {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for RelationshipType {}

impl Hash for RelationshipType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}
