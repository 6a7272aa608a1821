//! URI identifiers for relationship types and roles.
//!
//! A `Uri` carries a machine identifier plus a human name and description.
//! Identity is the identifier alone: two `Uri`s with the same `uri` compare
//! and hash equally whatever their names say. The standard vocabulary is
//! declared as `const` values; hosts may mint more at runtime.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Uri {
    uri: Cow<'static, str>,
    name: Cow<'static, str>,
    #[serde(default)]
    description: Cow<'static, str>,
}

impl Uri {
    /// A compile-time URI.
    #[must_use]
    pub const fn from_static(
        uri: &'static str,
        name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            uri: Cow::Borrowed(uri),
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
        }
    }

    /// A URI minted at runtime.
    #[must_use]
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: Cow::Owned(uri.into()),
            name: Cow::Owned(name.into()),
            description: Cow::Borrowed(""),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Cow::Owned(description.into());
        self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for Uri {}

impl Hash for Uri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl PartialOrd for Uri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uri.cmp(&other.uri)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
