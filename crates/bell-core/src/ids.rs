//! Entity ID prefixes and formatting helpers.
//!
//! IDs are `<prefix>-<suffix>` strings, e.g. `grp-developers` or `per-7`.
//! The prefix identifies the entity kind so that ids stay readable in logs.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const PREFIX_PERSON: &str = "per";
pub const PREFIX_GROUP: &str = "grp";
pub const PREFIX_SECTION: &str = "sec";
pub const PREFIX_COURSE: &str = "crs";
pub const PREFIX_RESOURCE: &str = "res";
pub const PREFIX_CONTACT: &str = "con";

/// Format a prefixed id.
#[must_use]
pub fn format_id(prefix: &str, suffix: &str) -> String {
    format!("{prefix}-{suffix}")
}

/// Opaque identity of a domain object participating in relationships.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the first `-`, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.0.split_once('-').map(|(prefix, _)| prefix)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
