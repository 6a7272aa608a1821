//! Temporal state meanings.
//!
//! A meaning is a short set of single-character flags describing what a
//! relationship state means to the system: `a` active, `i` inactive,
//! `p` parent. Flags combine, so `"ap"` is an active parent relationship.
//! Codes (the school-specific labels such as "graduated") live next to the
//! meaning in the temporal overlay and are free-form.

use std::borrow::Cow;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Meaning(Cow<'static, str>);

impl Meaning {
    pub const ACTIVE: Self = Self(Cow::Borrowed("a"));
    pub const INACTIVE: Self = Self(Cow::Borrowed("i"));
    pub const PARENT: Self = Self(Cow::Borrowed("p"));
    pub const ACTIVE_PARENT: Self = Self(Cow::Borrowed("ap"));

    #[must_use]
    pub fn new(flags: impl Into<String>) -> Self {
        Self(Cow::Owned(flags.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when every flag of `required` is present in `self`.
    ///
    /// An empty requirement is satisfied by any meaning.
    #[must_use]
    pub fn satisfies(&self, required: &Self) -> bool {
        required.0.chars().all(|flag| self.0.contains(flag))
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.satisfies(&Self::ACTIVE)
    }

    /// Union of both flag sets, keeping the order of first appearance.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        let mut flags = self.0.to_string();
        for flag in other.0.chars() {
            if !flags.contains(flag) {
                flags.push(flag);
            }
        }
        Self(Cow::Owned(flags))
    }
}

impl Default for Meaning {
    fn default() -> Self {
        Self::ACTIVE
    }
}

impl fmt::Display for Meaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
