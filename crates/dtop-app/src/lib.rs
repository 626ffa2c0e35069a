#![forbid(unsafe_code)]

//! DeployTop application: deployment topology viewer with power control.
//!
//! Wires the graph builder and layout engine to the terminal runtime:
//! a deployment is fetched once, derived into a laid-out directed graph,
//! and rendered beside a node list. The operator selects a node, opens its
//! action menu, and dispatches power commands; exactly one command can be
//! in flight at a time.

pub mod app;
pub mod cli;
pub mod client;
pub mod graph_view;
pub mod power;
pub mod selection;
pub mod theme;
