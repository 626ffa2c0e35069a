#![forbid(unsafe_code)]

//! Hierarchical (layered) layout for deployment topology graphs.
//!
//! Produces positioned vertices and routed edges in world-unit f64
//! coordinates. The engine is fully deterministic: the same input always
//! produces identical output, with no RNG and no shared workspace across
//! calls.
//!
//! # Pipeline
//! 1. Cycle removal (greedy source/sink peeling, self-loops dropped)
//! 2. Rank assignment (longest-path via topological sort)
//! 3. Crossing minimization (barycenter heuristic)
//! 4. Coordinate assignment (median refinement + overlap resolution)
//! 5. Direction remap, anchor sides, center-to-top-left conversion,
//!    edge routing, bounds
//!
//! Cyclic, self-referential, duplicated, and disconnected inputs all
//! terminate and yield a finite position for every vertex.

pub mod config;
pub mod engine;

pub use config::{AnchorSide, Direction, LayoutConfig};
pub use engine::{
    LayoutResult, LayoutStats, PlacedEdge, PlacedVertex, layout, layout_with_config,
};
