use bell_core::EntityId;
use chrono::NaiveDate;

/// Errors raised by the relationship engine.
///
/// Every error is raised before the graph is touched, so a failed call
/// leaves links, shared state and temporal history exactly as they were.
#[derive(Debug, thiserror::Error)]
pub enum RelationshipError {
    /// An identical edge already exists between the two participants.
    #[error("{entity} is already related to {target} as {role} ({rel_type})")]
    Duplicate {
        entity: EntityId,
        target: EntityId,
        role: String,
        rel_type: String,
    },

    /// A validator vetoed the operation. The message is shown verbatim.
    #[error("{0}")]
    Invalid(String),

    /// Neither half of the requested edge exists.
    #[error("no {rel_type} relationship between {a} and {b}")]
    NoSuchRelationship { rel_type: String, a: EntityId, b: EntityId },

    /// A schema or property was called with the wrong party names.
    #[error("usage error: {0}")]
    Usage(String),

    /// A temporal state entry predates the last recorded entry.
    #[error("state for {date} predates the last recorded state on {last}")]
    StateOutOfOrder { date: NaiveDate, last: NaiveDate },

    #[error("link '{0}' does not belong to this link set")]
    LinkNotFound(String),

    #[error("an identical link to {0} is already in this link set")]
    DuplicateLink(EntityId),
}

impl RelationshipError {
    /// Duplicates count as invalid relationships, so hosts can treat both
    /// as "the user asked for something that cannot be".
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Duplicate { .. } | Self::Invalid(_))
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
