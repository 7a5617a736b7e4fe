//! Layered layout of resource graphs.
//!
//! The phases run in this order, each refining the previous result:
//!
//! 1. [`Layerer`] ranks nodes into layers;
//! 2. [`CrossingMinimizer`] reorders nodes within layers;
//! 3. [`CoordinateAssigner`] turns ranks into positions;
//! 4. [`CollisionResolver`] pushes overlapping nodes apart;
//! 5. [`EdgeRouter`] computes the path of every edge.
//!
//! The engines in [`engines`] wire the phases together.

mod adjacency;
mod collision;
pub mod engines;
mod layering;
mod ordering;
mod positioning;
mod routing;
mod types;

pub use collision::CollisionResolver;
pub use engines::{EngineBuilder, LayoutEngine, LayoutEngineKind};
pub use layering::{Layerer, Layers};
pub use ordering::CrossingMinimizer;
pub use positioning::CoordinateAssigner;
pub use routing::{ARROW_CLEARANCE, EdgeRouter, STRAIGHT_THRESHOLD};
pub use types::{Direction, EdgeLayout, Layout, LayoutOptions, NodeLayout, PathShape};
