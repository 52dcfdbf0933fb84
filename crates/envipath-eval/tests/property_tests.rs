//! Property-based tests for depth weights and upstream adjacency.

#![allow(clippy::mutable_key_type)]

use approx::relative_eq;
use envipath_eval::{compare, depth_weight, PathwayGraph, MAX_WEIGHTED_DEPTH};
use envipath_model::{MemoryFetcher, Node, Pathway, ResourceType, SharedFetcher};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

/// Start-node sets of the edges ending at one target, as indices into a pool
/// of eight upstream nodes.
fn incoming_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..8, 1..4), 1..6)
}

fn fan_in_pathway(incoming: &[Vec<usize>]) -> Value {
    let mut nodes = vec![json!({"id": "T", "depth": 2})];
    nodes.extend((0..8).map(|i| json!({"id": format!("U{i}"), "depth": 1})));
    let links: Vec<Value> = incoming
        .iter()
        .enumerate()
        .map(|(i, starts)| {
            let starts: Vec<Value> = starts.iter().map(|s| json!({"id": format!("U{s}")})).collect();
            json!({"id": format!("e{i}"), "startNodes": starts, "endNodes": [{"id": "T"}]})
        })
        .collect();
    json!({"nodes": nodes, "links": links})
}

fn shared(memory: &Arc<MemoryFetcher>) -> SharedFetcher {
    memory.clone()
}

// ============================================================================
// Depth weights
// ============================================================================

proptest! {
    #[test]
    fn depth_weight_strictly_decreases(a in 0u32..=MAX_WEIGHTED_DEPTH, b in 0u32..=MAX_WEIGHTED_DEPTH) {
        prop_assume!(a != b);
        let (shallow, deep) = if a < b { (a, b) } else { (b, a) };
        prop_assert!(depth_weight(shallow) > depth_weight(deep));
    }

    #[test]
    fn depth_weight_halves_per_level(depth in 0u32..1000) {
        prop_assert!(relative_eq!(depth_weight(depth), 2.0 * depth_weight(depth + 1)));
        prop_assert!(depth_weight(depth) <= 1.0);
        prop_assert!(depth_weight(depth) > 0.0);
    }
}

// ============================================================================
// Upstream adjacency
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn upstream_is_union_of_start_sets(incoming in incoming_strategy()) {
        let memory = Arc::new(MemoryFetcher::new("http://localhost/"));
        memory.insert("pw", fan_in_pathway(&incoming));
        let fetcher = shared(&memory);

        let graph = PathwayGraph::build(&Pathway::new(fetcher.clone(), "pw")).unwrap();
        let target = Node::new(fetcher.clone(), "T");

        let expected: HashSet<Node> = incoming
            .iter()
            .flatten()
            .map(|i| Node::new(fetcher.clone(), format!("U{i}")))
            .collect();
        prop_assert_eq!(graph.upstream(&target).unwrap(), &expected);
        prop_assert_eq!(graph.incoming(&target).len(), incoming.len());
    }

    #[test]
    fn self_comparison_never_misses(incoming in incoming_strategy()) {
        let memory = Arc::new(MemoryFetcher::new("http://localhost/"));
        memory.insert("pw", fan_in_pathway(&incoming));
        let fetcher = shared(&memory);
        let pathway = Pathway::new(fetcher, "pw");

        let result = compare(&pathway, &pathway).unwrap();
        prop_assert_eq!(result.totals.false_negative, 0.0);
        prop_assert!(relative_eq!(result.totals.true_positive_predicted, 0.25));
        prop_assert_eq!(result.correct_edges.len(), incoming.len());
    }
}
