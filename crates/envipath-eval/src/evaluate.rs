//! Re-predicting a reference pathway and scoring the prediction.

use crate::compare::{compare_with, CompareOptions, PathwayComparison};
use crate::error::{EvalError, Result};
use envipath_model::{Node, OptionalExt, Package, Pathway, PathwayRequest, ResourceType, Setting};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Produces a predicted pathway for a root compound.
pub trait PathwayPredictor {
    fn predict(&self, root: &Node, setting: &Setting) -> Result<Pathway>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Pause between two completion checks.
    pub interval_ms: u64,
    pub max_polls: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            max_polls: 150,
        }
    }
}

/// Predicts by creating a pathway in a scratch package and waiting for the
/// service to finish it.
#[derive(Debug, Clone)]
pub struct PackagePredictor {
    package: Package,
    poll: PollSettings,
}

impl PackagePredictor {
    pub fn new(package: Package) -> Self {
        Self::with_poll(package, PollSettings::default())
    }

    pub fn with_poll(package: Package, poll: PollSettings) -> Self {
        Self { package, poll }
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Reads the completion flag through a new instance each time; a
    /// hydrated instance would never see the flag change.
    fn wait_for(&self, pathway: &Pathway) -> Result<Pathway> {
        let id = pathway.id()?.to_string();
        let fetcher = pathway.resource().fetcher();
        for attempt in 1..=self.poll.max_polls {
            let fresh = Pathway::new(Arc::clone(fetcher), id.as_str());
            if fresh.is_completed().optional()?.unwrap_or(false) {
                tracing::debug!(pathway = %id, attempt, "prediction completed");
                return Ok(fresh);
            }
            tracing::debug!(pathway = %id, attempt, "prediction still running");
            if attempt < self.poll.max_polls && self.poll.interval_ms > 0 {
                std::thread::sleep(Duration::from_millis(self.poll.interval_ms));
            }
        }
        Err(EvalError::PredictionIncomplete {
            pathway: id,
            polls: self.poll.max_polls,
        })
    }
}

impl PathwayPredictor for PackagePredictor {
    fn predict(&self, root: &Node, setting: &Setting) -> Result<Pathway> {
        let smiles = root.smiles()?;
        let name = format!("Prediction for {}", root.name().unwrap_or_else(|_| smiles.clone()));
        let request = PathwayRequest {
            name: Some(name.as_str()),
            setting: Some(setting),
            ..PathwayRequest::default()
        };
        let pathway = Pathway::create(&self.package, &smiles, &request)?;
        tracing::debug!(pathway = pathway.id()?, %smiles, "requested prediction");
        self.wait_for(&pathway)
    }
}

/// Root of `pathway`: the shallowest node no edge ends at.
pub fn root_node(pathway: &Pathway) -> Result<Node> {
    let roots = pathway.root_nodes()?;
    if roots.len() > 1 {
        tracing::warn!(
            pathway = pathway.id()?,
            count = roots.len(),
            "pathway has several roots, using the shallowest"
        );
    }
    let mut best: Option<(u32, Node)> = None;
    for node in roots {
        let depth = node.depth()?;
        if best.as_ref().map_or(true, |(d, _)| depth < *d) {
            best = Some((depth, node));
        }
    }
    best.map(|(_, node)| node)
        .ok_or_else(|| match pathway.id() {
            Ok(id) => EvalError::NoRoot(id.to_string()),
            Err(err) => err.into(),
        })
}

/// Predicts a pathway from the root of `reference` with `setting` and scores
/// the prediction against `reference`.
pub fn evaluate<P: PathwayPredictor + ?Sized>(
    reference: &Pathway,
    setting: &Setting,
    predictor: &P,
    options: &CompareOptions,
) -> Result<PathwayComparison> {
    let root = root_node(reference)?;
    let predicted = predictor.predict(&root, setting)?;
    Ok(compare_with(&predicted, reference, options)?)
}
