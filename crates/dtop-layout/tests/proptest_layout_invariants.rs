//! Property-based invariant tests for the layered layout engine.
//!
//! For arbitrary graphs (including cycles, self-loops, duplicate and
//! disconnected structure):
//!
//! 1. Every vertex receives a finite position, in every direction.
//! 2. Ranks are consistent with kept edge direction (never decreasing
//!    along a non-reversed, non-self edge).
//! 3. Relative rank ordering along the layout axis is stable across runs.
//! 4. Bounds contain every vertex box.
//! 5. The pipeline terminates (implicitly: these tests complete).

use dtop_graph::{DeploymentNode, Graph, build_graph};
use dtop_layout::{Direction, layout};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn graph_strategy() -> impl Strategy<Value = Graph> {
    (1usize..=16).prop_flat_map(|n| {
        proptest::collection::vec((0usize..n, 0usize..n), 0..32).prop_map(move |pairs| {
            let mut nodes: Vec<DeploymentNode> = (0..n)
                .map(|i| DeploymentNode::new(format!("n{i}"), format!("res-{i}")))
                .collect();
            for (s, t) in pairs {
                let next = format!("n{t}");
                if !nodes[s].next_node_ids.contains(&next) {
                    nodes[s].next_node_ids.push(next);
                }
            }
            build_graph(&nodes).expect("generated references are valid")
        })
    })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::TopToBottom),
        Just(Direction::BottomToTop),
        Just(Direction::LeftToRight),
        Just(Direction::RightToLeft),
    ]
}

/// The coordinate of a vertex along the flow axis, oriented so that it
/// increases with rank.
fn flow_coord(direction: Direction, x: f64, y: f64) -> f64 {
    match direction {
        Direction::TopToBottom => y,
        Direction::BottomToTop => -y,
        Direction::LeftToRight => x,
        Direction::RightToLeft => -x,
    }
}

proptest! {
    #[test]
    fn every_vertex_gets_finite_position(
        g in graph_strategy(),
        direction in direction_strategy(),
    ) {
        let result = layout(&g, direction);
        prop_assert_eq!(result.vertices.len(), g.vertex_count());
        for v in &result.vertices {
            prop_assert!(v.x.is_finite(), "vertex {} x not finite", v.index);
            prop_assert!(v.y.is_finite(), "vertex {} y not finite", v.index);
        }
    }

    #[test]
    fn ranks_monotone_along_kept_edges(g in graph_strategy()) {
        let result = layout(&g, Direction::TopToBottom);
        for e in &result.edges {
            if e.self_loop || e.reversed {
                continue;
            }
            let src = &result.vertices[e.source];
            let tgt = &result.vertices[e.target];
            prop_assert!(
                src.rank < tgt.rank,
                "edge {} -> {} not increasing in rank ({} >= {})",
                e.source, e.target, src.rank, tgt.rank
            );
        }
    }

    #[test]
    fn rank_ordering_stable_across_runs(
        g in graph_strategy(),
        direction in direction_strategy(),
    ) {
        let a = layout(&g, direction);
        let b = layout(&g, direction);

        let order_of = |result: &dtop_layout::LayoutResult| {
            let mut order: Vec<usize> = (0..result.vertices.len()).collect();
            order.sort_by(|&i, &j| {
                let vi = &result.vertices[i];
                let vj = &result.vertices[j];
                flow_coord(direction, vi.x, vi.y)
                    .total_cmp(&flow_coord(direction, vj.x, vj.y))
                    .then_with(|| i.cmp(&j))
            });
            order
        };
        prop_assert_eq!(order_of(&a), order_of(&b));
    }

    #[test]
    fn higher_rank_means_farther_along_flow_axis(
        g in graph_strategy(),
        direction in direction_strategy(),
    ) {
        let result = layout(&g, direction);
        for a in &result.vertices {
            for b in &result.vertices {
                if a.rank < b.rank {
                    let fa = flow_coord(direction, a.x, a.y);
                    let fb = flow_coord(direction, b.x, b.y);
                    prop_assert!(
                        fa < fb,
                        "rank {} not before rank {} along {:?}",
                        a.rank, b.rank, direction
                    );
                }
            }
        }
    }

    #[test]
    fn bounds_contain_every_box(
        g in graph_strategy(),
        direction in direction_strategy(),
    ) {
        let result = layout(&g, direction);
        let (x0, y0, x1, y1) = result.bounds;
        for v in &result.vertices {
            prop_assert!(v.x >= x0 - 1e-9);
            prop_assert!(v.y >= y0 - 1e-9);
            prop_assert!(v.x + v.width <= x1 + 1e-9);
            prop_assert!(v.y + v.height <= y1 + 1e-9);
        }
    }
}
