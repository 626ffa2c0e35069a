#![forbid(unsafe_code)]

//! Deployment topology data model and graph builder.
//!
//! A deployment is fetched as a flat list of [`DeploymentNode`]s, each
//! carrying the ids of its successors. [`build_graph`] turns that list into
//! a [`Graph`] of vertices and directed edges suitable for hierarchical
//! layout and rendering.
//!
//! The graph is a derived, ephemeral structure: it is rebuilt wholesale
//! every time the node list changes and never patched incrementally.

pub mod graph;
pub mod node;

pub use graph::{Edge, Graph, GraphIntegrityError, Vertex, build_graph};
pub use node::{Deployment, DeploymentNode, NodeFeatures};
