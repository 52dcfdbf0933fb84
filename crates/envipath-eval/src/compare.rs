//! Weighted comparison of a predicted pathway against a reference pathway.
//!
//! Every reference node with at least one incoming edge is classified:
//!
//! - absent from the predicted pathway: false negative
//! - at the root depth: skipped
//! - predicted upstream set shares a node with the reference upstream set:
//!   true positive
//! - otherwise: false negative (present but wrongly connected)
//!
//! Nodes contribute their depth weight `1 / 2^depth`, so mistakes close to
//! the root cost more than mistakes deep in the pathway.

#![allow(clippy::mutable_key_type)]

use crate::graph::PathwayGraph;
use envipath_model::{Edge, Node, Pathway, Result, ResourceType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Depth of the pathway root. Reference nodes at this depth are not
    /// scored. Pathways number their root 0; some historic scoring runs
    /// used 1.
    pub root_depth: u32,
    /// Walk the predicted pathway as well and weigh its nodes that the
    /// reference lacks or connects differently. Off by default, leaving the
    /// false-positive total at zero.
    pub count_false_positives: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            root_depth: 0,
            count_false_positives: false,
        }
    }
}

/// The four weighted totals of a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTotals {
    /// Predicted-side weight of the true positives.
    pub true_positive_predicted: f64,
    /// Reference-side weight of the true positives.
    pub true_positive_reference: f64,
    pub false_positive: f64,
    pub false_negative: f64,
}

impl ComparisonTotals {
    /// `tp / (tp + fp)` on the predicted side, `None` without any predicted
    /// weight.
    pub fn precision(&self) -> Option<f64> {
        ratio(
            self.true_positive_predicted,
            self.true_positive_predicted + self.false_positive,
        )
    }

    /// `tp / (tp + fn)` on the reference side, `None` without any reference
    /// weight.
    pub fn recall(&self) -> Option<f64> {
        ratio(
            self.true_positive_reference,
            self.true_positive_reference + self.false_negative,
        )
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathwayComparison {
    pub totals: ComparisonTotals,
    /// Reference nodes classified as true positives.
    pub correct_nodes: HashSet<Node>,
    /// Reference nodes classified as false negatives.
    pub incorrect_nodes: HashSet<Node>,
    /// Reference edges into a correct node whose start nodes the prediction
    /// also links to it.
    pub correct_edges: HashSet<Edge>,
    /// Remaining reference edges into scored nodes.
    pub incorrect_edges: HashSet<Edge>,
    /// Predicted nodes counted as false positives.
    pub spurious_nodes: HashSet<Node>,
}

impl PathwayComparison {
    /// `(true_positive_predicted, true_positive_reference, false_positive,
    /// false_negative)`
    pub fn weights(&self) -> (f64, f64, f64, f64) {
        let t = &self.totals;
        (
            t.true_positive_predicted,
            t.true_positive_reference,
            t.false_positive,
            t.false_negative,
        )
    }

    pub fn precision(&self) -> Option<f64> {
        self.totals.precision()
    }

    pub fn recall(&self) -> Option<f64> {
        self.totals.recall()
    }
}

pub fn compare(predicted: &Pathway, reference: &Pathway) -> Result<PathwayComparison> {
    compare_with(predicted, reference, &CompareOptions::default())
}

pub fn compare_with(
    predicted: &Pathway,
    reference: &Pathway,
    options: &CompareOptions,
) -> Result<PathwayComparison> {
    let predicted_graph = PathwayGraph::build(predicted)?;
    let reference_graph = PathwayGraph::build(reference)?;
    let comparison = compare_graphs(&predicted_graph, &reference_graph, options);

    let t = &comparison.totals;
    tracing::info!(
        predicted = predicted.id()?,
        reference = reference.id()?,
        true_positive_predicted = t.true_positive_predicted,
        true_positive_reference = t.true_positive_reference,
        false_positive = t.false_positive,
        false_negative = t.false_negative,
        correct = comparison.correct_nodes.len(),
        incorrect = comparison.incorrect_nodes.len(),
        "compared pathways"
    );
    Ok(comparison)
}

/// Scores two prebuilt graphs. Pure; neither graph is modified.
pub fn compare_graphs(
    predicted: &PathwayGraph,
    reference: &PathwayGraph,
    options: &CompareOptions,
) -> PathwayComparison {
    let mut result = PathwayComparison::default();
    let empty = HashSet::new();

    for (node, reference_upstream) in reference.targets() {
        let reference_weight = reference.weight(node).unwrap_or(0.0);

        if !predicted.contains(node) {
            result.totals.false_negative += reference_weight;
            result.incorrect_nodes.insert(node.clone());
            result
                .incorrect_edges
                .extend(reference.incoming(node).iter().cloned());
            continue;
        }
        if reference.depth(node) == Some(options.root_depth) {
            continue;
        }

        let predicted_upstream = predicted.upstream(node).unwrap_or(&empty);
        if reference_upstream.is_disjoint(predicted_upstream) {
            result.totals.false_negative += reference_weight;
            result.incorrect_nodes.insert(node.clone());
            result
                .incorrect_edges
                .extend(reference.incoming(node).iter().cloned());
            continue;
        }

        result.totals.true_positive_predicted += predicted.weight(node).unwrap_or(0.0);
        result.totals.true_positive_reference += reference_weight;
        result.correct_nodes.insert(node.clone());
        for edge in reference.incoming(node) {
            let matched = reference
                .start_nodes(edge)
                .is_some_and(|starts| !starts.is_disjoint(predicted_upstream));
            if matched {
                result.correct_edges.insert(edge.clone());
            } else {
                result.incorrect_edges.insert(edge.clone());
            }
        }
    }

    if options.count_false_positives {
        count_false_positives(predicted, reference, options, &mut result);
    }
    result
}

/// Mirror of the reference walk over the predicted targets.
fn count_false_positives(
    predicted: &PathwayGraph,
    reference: &PathwayGraph,
    options: &CompareOptions,
    result: &mut PathwayComparison,
) {
    let empty = HashSet::new();
    for (node, predicted_upstream) in predicted.targets() {
        if reference.contains(node) && predicted.depth(node) == Some(options.root_depth) {
            continue;
        }
        let reference_upstream = reference.upstream(node).unwrap_or(&empty);
        let spurious =
            !reference.contains(node) || predicted_upstream.is_disjoint(reference_upstream);
        if spurious {
            result.totals.false_positive += predicted.weight(node).unwrap_or(0.0);
            result.spurious_nodes.insert(node.clone());
        }
    }
}
