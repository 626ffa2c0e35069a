//! Property-based invariant tests for graph building.
//!
//! For arbitrary node lists with successor references among valid indices:
//!
//! 1. Exactly one vertex per node, in input order.
//! 2. Every edge's endpoints exist among the produced vertices.
//! 3. Edge count equals the number of distinct (source, target) pairs.
//! 4. Seed positions are `(100 * index, 0)`.
//! 5. Building is deterministic.

use std::collections::HashSet;

use dtop_graph::{DeploymentNode, build_graph};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// A node list of length 0..=24 where every successor reference points at a
/// valid index in the same list.
fn nodes_strategy() -> impl Strategy<Value = Vec<DeploymentNode>> {
    (0usize..=24).prop_flat_map(|n| {
        let succ = if n == 0 {
            // No valid targets exist; generate empty successor lists.
            proptest::collection::vec(proptest::collection::vec(0usize..1, 0..1), 0..1).boxed()
        } else {
            proptest::collection::vec(proptest::collection::vec(0usize..n, 0..4), n..=n).boxed()
        };
        succ.prop_map(move |succs| {
            (0..n)
                .map(|i| {
                    let mut node = DeploymentNode::new(format!("n{i}"), format!("res-{i}"));
                    if let Some(targets) = succs.get(i) {
                        for &t in targets {
                            node = node.next(format!("n{t}"));
                        }
                    }
                    node
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn one_vertex_per_node_in_order(nodes in nodes_strategy()) {
        let g = build_graph(&nodes).expect("valid references must build");
        prop_assert_eq!(g.vertex_count(), nodes.len());
        for (i, v) in g.vertices.iter().enumerate() {
            prop_assert_eq!(v.index, i);
            prop_assert_eq!(v.id(), nodes[i].id.as_str());
        }
    }

    #[test]
    fn edge_endpoints_are_valid(nodes in nodes_strategy()) {
        let g = build_graph(&nodes).expect("valid references must build");
        for e in &g.edges {
            prop_assert!(e.source < g.vertex_count());
            prop_assert!(e.target < g.vertex_count());
        }
    }

    #[test]
    fn edge_count_matches_distinct_pairs(nodes in nodes_strategy()) {
        let g = build_graph(&nodes).expect("valid references must build");
        let mut distinct: HashSet<(usize, usize)> = HashSet::new();
        for (i, node) in nodes.iter().enumerate() {
            for t in &node.next_node_ids {
                let target: usize = t[1..].parse().unwrap();
                distinct.insert((i, target));
            }
        }
        prop_assert_eq!(g.edge_count(), distinct.len());
    }

    #[test]
    fn seeds_follow_index(nodes in nodes_strategy()) {
        let g = build_graph(&nodes).expect("valid references must build");
        for v in &g.vertices {
            prop_assert_eq!(v.seed, (100.0 * v.index as f64, 0.0));
        }
    }

    #[test]
    fn building_is_deterministic(nodes in nodes_strategy()) {
        let a = build_graph(&nodes).expect("valid references must build");
        let b = build_graph(&nodes).expect("valid references must build");
        prop_assert_eq!(a, b);
    }
}
