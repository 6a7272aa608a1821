//! # bell-core
//!
//! Core types shared across all SchoolBell crates.
//!
//! This crate provides the foundational vocabulary used by the relationship
//! graph and the timetable engine:
//! - Entity handles and the capability model used by relationship validators
//! - ID prefix constants and formatting helpers
//! - URI identifiers for relationship types and roles
//! - Temporal state meanings (active, inactive, parent, ...)
//! - Cross-cutting error types

pub mod entity;
pub mod errors;
pub mod ids;
pub mod meaning;
pub mod uri;

pub use entity::{Capability, EntityKind, EntityRef};
pub use errors::CoreError;
pub use ids::EntityId;
pub use meaning::Meaning;
pub use uri::Uri;
