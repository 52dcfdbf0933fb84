//! Pathway scoring
//!
//! Compares a predicted pathway against a reference pathway node by node.
//! A reference node counts as found when the prediction links it to at least
//! one of the nodes it is linked from in the reference; every node is
//! weighted by `1 / 2^depth`.
//!
//! ```
//! use envipath_eval::compare;
//! use envipath_model::{MemoryFetcher, Pathway, ResourceType, SharedFetcher};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryFetcher::new("http://localhost/"));
//! memory.insert("pw/1", json!({
//!     "nodes": [{"id": "r", "depth": 0}, {"id": "a", "depth": 1}],
//!     "links": [{"id": "e", "startNodes": [{"id": "r"}], "endNodes": [{"id": "a"}]}]
//! }));
//! let fetcher: SharedFetcher = memory.clone();
//! let pathway = Pathway::new(fetcher, "pw/1");
//!
//! let result = compare(&pathway, &pathway).unwrap();
//! assert_eq!(result.weights(), (0.5, 0.5, 0.0, 0.0));
//! assert_eq!(result.recall(), Some(1.0));
//! ```

pub mod compare;
pub mod error;
pub mod evaluate;
pub mod graph;

pub use compare::{compare, compare_graphs, compare_with, CompareOptions, ComparisonTotals, PathwayComparison};
pub use error::{EvalError, Result};
pub use evaluate::{evaluate, root_node, PackagePredictor, PathwayPredictor, PollSettings};
pub use graph::{depth_weight, PathwayGraph, MAX_WEIGHTED_DEPTH};
