//! Dependency graph construction.
//!
//! [`GraphBuilder`] turns resource records into a [`Graph`] of typed nodes and
//! labelled edges, combining declared dependencies with connections inferred
//! from attribute cross-references.

mod builder;
mod graph;
mod implicit;
mod metadata;
mod relationship;

pub use builder::{BuildPhase, GraphBuilder};
pub use graph::{Edge, Graph, Metadata, Node, empty_metadata};
pub use relationship::Relationship;
