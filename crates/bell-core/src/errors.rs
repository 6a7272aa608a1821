//! Cross-cutting error types for SchoolBell.
//!
//! Domain-specific errors (`RelationshipError`, `TimetableError`) are defined
//! in their respective crates.

use thiserror::Error;

/// Errors that can be raised by any SchoolBell crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not name a known entity kind.
    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),

    /// An entity id did not carry the prefix its kind requires.
    #[error("Invalid entity id '{id}' for kind {kind}")]
    InvalidEntityId { kind: String, id: String },
}
