//! Derived topology graph and its builder.
//!
//! [`build_graph`] is a pure function from a node list to a [`Graph`]:
//! one vertex per node, one directed edge per successor reference. A
//! successor id with no matching node is upstream data corruption and is
//! reported as [`GraphIntegrityError`] rather than silently dropped.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::node::DeploymentNode;

/// Horizontal spacing between vertex seed positions.
///
/// Seeds only matter for degenerate inputs (a single vertex, or a layout
/// pass that never runs); the layout engine overwrites them.
const SEED_SPACING_X: f64 = 100.0;

/// A vertex in the topology graph, owning a copy of its source node.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Position of the source node in the input sequence.
    pub index: usize,
    /// Deterministic fallback position `(100 * index, 0)`.
    pub seed: (f64, f64),
    /// The deployment node this vertex represents.
    pub node: DeploymentNode,
}

impl Vertex {
    /// The node id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.node.id
    }
}

/// A directed edge between two vertices, by vertex index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Deterministic edge id, `"{source_id}-{target_id}"`.
    pub id: String,
    /// Index of the source vertex.
    pub source: usize,
    /// Index of the target vertex.
    pub target: usize,
}

/// A derived, ephemeral topology graph.
///
/// Rebuilt from scratch whenever the node list changes. Every edge's
/// endpoints are valid indices into `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
}

impl Graph {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges (after duplicate collapse).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Look up a vertex index by node id.
    #[must_use]
    pub fn vertex_by_id(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }
}

/// Data-integrity failure while deriving the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIntegrityError {
    /// A successor reference points at an id absent from the node list.
    DanglingEdge { source_id: String, target_id: String },
    /// Two nodes in the same list share an id.
    DuplicateNodeId { id: String },
}

impl fmt::Display for GraphIntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEdge {
                source_id,
                target_id,
            } => write!(
                f,
                "node {source_id} references nonexistent successor {target_id}"
            ),
            Self::DuplicateNodeId { id } => write!(f, "duplicate node id {id}"),
        }
    }
}

impl std::error::Error for GraphIntegrityError {}

/// Build a [`Graph`] from a deployment's node list.
///
/// An empty input yields an empty graph (valid, renders nothing). Duplicate
/// `source -> target` pairs collapse to a single edge; self-edges are kept
/// (the layout engine tolerates them). A dangling successor reference is an
/// error: silent drops would hide backend bugs.
pub fn build_graph(nodes: &[DeploymentNode]) -> Result<Graph, GraphIntegrityError> {
    let mut index_by_id = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index_by_id.insert(node.id.clone(), i).is_some() {
            return Err(GraphIntegrityError::DuplicateNodeId {
                id: node.id.clone(),
            });
        }
    }

    let vertices: Vec<Vertex> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| Vertex {
            index: i,
            seed: (SEED_SPACING_X * i as f64, 0.0),
            node: node.clone(),
        })
        .collect();

    let mut edges = Vec::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    for (source, node) in nodes.iter().enumerate() {
        for target_id in &node.next_node_ids {
            let Some(&target) = index_by_id.get(target_id) else {
                return Err(GraphIntegrityError::DanglingEdge {
                    source_id: node.id.clone(),
                    target_id: target_id.clone(),
                });
            };
            if !seen.insert((source, target)) {
                debug!(
                    source = %node.id,
                    target = %target_id,
                    "collapsing duplicate edge"
                );
                continue;
            }
            edges.push(Edge {
                id: format!("{}-{}", node.id, target_id),
                source,
                target,
            });
        }
    }

    Ok(Graph {
        vertices,
        edges,
        index_by_id,
    })
}
