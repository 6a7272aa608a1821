//! Relationship engine policy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RelationshipConfig {
    /// Allow groups to be members of other groups.
    ///
    /// When off, Membership rejects any member that is itself a group. When
    /// on, nested groups are accepted and only cycles are rejected.
    #[serde(default)]
    pub allow_nested_groups: bool,
}
