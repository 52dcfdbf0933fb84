//! Read-only graph view over a hydrated pathway.

// Node and Edge hash by identifier only; their interior cache never affects
// the key.
#![allow(clippy::mutable_key_type)]

use envipath_model::{Edge, Node, Pathway, ResourceType, Result};
use std::collections::{HashMap, HashSet};

/// Deepest level whose weight is still representable as a non-zero `f64`
/// (the smallest subnormal, `2^-1074`).
pub const MAX_WEIGHTED_DEPTH: u32 = 1074;

/// Importance of a node `depth` steps away from the root: `1 / 2^depth`.
///
/// Strictly decreasing up to [`MAX_WEIGHTED_DEPTH`]. Every deeper node
/// weighs exactly `0.0` and no longer contributes to a comparison.
pub fn depth_weight(depth: u32) -> f64 {
    0.5f64.powi(i32::try_from(depth).unwrap_or(i32::MAX))
}

#[derive(Debug, Clone, Default)]
pub struct PathwayGraph {
    nodes: HashSet<Node>,
    depths: HashMap<Node, u32>,
    upstream: HashMap<Node, HashSet<Node>>,
    incoming: HashMap<Node, Vec<Edge>>,
    starts: HashMap<Edge, HashSet<Node>>,
}

impl PathwayGraph {
    /// Reads the nodes and edges of `pathway` once and indexes them.
    ///
    /// All edges ending at the same node contribute to one upstream set.
    /// Edge endpoints missing from the node list still get a depth.
    pub fn build(pathway: &Pathway) -> Result<Self> {
        let mut graph = PathwayGraph::default();

        for node in pathway.nodes()? {
            let depth = node.depth()?;
            graph.depths.insert(node.clone(), depth);
            graph.nodes.insert(node);
        }

        for edge in pathway.edges()? {
            let starts = edge.start_nodes()?;
            for end in edge.end_nodes()? {
                graph
                    .upstream
                    .entry(end.clone())
                    .or_default()
                    .extend(starts.iter().cloned());
                graph.incoming.entry(end).or_default().push(edge.clone());
            }
            for node in &starts {
                graph.register(node.clone())?;
            }
            graph.starts.insert(edge, starts.into_iter().collect());
        }

        let ends: Vec<Node> = graph.upstream.keys().cloned().collect();
        for node in ends {
            graph.register(node)?;
        }

        tracing::debug!(
            pathway = pathway.id()?,
            nodes = graph.nodes.len(),
            targets = graph.upstream.len(),
            "built pathway graph"
        );
        Ok(graph)
    }

    fn register(&mut self, node: Node) -> Result<()> {
        if !self.depths.contains_key(&node) {
            let depth = node.depth()?;
            self.depths.insert(node.clone(), depth);
        }
        self.nodes.insert(node);
        Ok(())
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self, node: &Node) -> Option<u32> {
        self.depths.get(node).copied()
    }

    pub fn weight(&self, node: &Node) -> Option<f64> {
        self.depth(node).map(depth_weight)
    }

    /// Start nodes of every edge ending at `node`; `None` when no edge ends
    /// there.
    pub fn upstream(&self, node: &Node) -> Option<&HashSet<Node>> {
        self.upstream.get(node)
    }

    /// Every node with at least one incoming edge, with its upstream set.
    pub fn targets(&self) -> impl Iterator<Item = (&Node, &HashSet<Node>)> {
        self.upstream.iter()
    }

    pub fn incoming(&self, node: &Node) -> &[Edge] {
        self.incoming.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Start nodes of `edge` as read when the graph was built.
    pub fn start_nodes(&self, edge: &Edge) -> Option<&HashSet<Node>> {
        self.starts.get(edge)
    }
}
