//! # bell-graph
//!
//! A typed, bidirectional relationship graph between school entities.
//!
//! Relationships are stored as pairs of [`Link`]s, one in each
//! participant's [`LinkSet`]. Creating or breaking a relationship goes
//! through registered [`RelationshipValidator`]s, which may veto it, and
//! then notifies [`RelationshipObserver`]s. Temporal relationship types
//! carry a dated state log per edge and hide edges that are not active on
//! the graph's evaluation date.
//!
//! ```
//! use bell_config::RelationshipConfig;
//! use bell_core::EntityRef;
//! use bell_graph::{MEMBERSHIP, RelationshipGraph};
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
//! let mut graph = RelationshipGraph::with_standard_validators(&RelationshipConfig::default(), today);
//! let pupil = EntityRef::person("jonas");
//! let class = EntityRef::group("5a");
//! MEMBERSHIP.relate(&mut graph, &[("member", &pupil), ("group", &class)])?;
//! assert_eq!(MEMBERSHIP.query(&graph, ("member", &pupil))?, vec![class]);
//! # Ok::<(), bell_graph::RelationshipError>(())
//! ```

mod error;
mod events;
mod graph;
mod link;
mod rel_type;
mod schema;
mod temporal;
pub mod validators;
pub mod vocabulary;

pub use error::RelationshipError;
pub use events::{EventPhase, RelationshipEvent, RelationshipMatch, RelationshipObserver, RelationshipValidator};
pub use graph::{Party, RelationshipGraph, SharedState};
pub use link::{EdgeId, Link, LinkSet};
pub use rel_type::RelationshipType;
pub use schema::{BoundRelationship, DatedRelationship, RelationshipInfo, RelationshipProperty, RelationshipSchema};
pub use temporal::{DEFAULT_CODE, StateEntry, TemporalState};
pub use validators::is_transitive_member;
pub use vocabulary::*;
