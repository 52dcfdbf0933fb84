//! Prediction settings and relative-reasoning models.

use crate::endpoint::{ModelKind, ResourceKind};
use crate::error::{ModelError, OptionalExt, Result};
use crate::package::Package;
use crate::resource::{resource_type, ResourceType};
use serde::{Deserialize, Serialize};

resource_type! {
    /// Named bundle of everything a prediction needs: rule packages, search
    /// limits, an optional relative-reasoning model and normalization rules.
    Setting => Setting
}

resource_type! {
    /// Classifier trained over a set of packages to rank rule applications.
    RelativeReasoning => RelativeReasoning
}

resource_type! {
    ApplicabilityDomain => ApplicabilityDomain
}

/// Rule applied to every structure before prediction starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRule {
    #[serde(default)]
    pub name: Option<String>,
    pub smirks: String,
}

impl Setting {
    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    /// Packages whose rules the setting applies.
    pub fn included_packages(&self) -> Result<Vec<Package>> {
        self.resource().materialize_nested("includedPackages")
    }

    pub fn depth_limit(&self) -> Result<Option<u32>> {
        self.resource().get_u32("depthLimit").optional()
    }

    pub fn node_limit(&self) -> Result<Option<u32>> {
        self.resource().get_u32("nodeLimit").optional()
    }

    /// Compounds with fewer carbon atoms than this are not expanded.
    pub fn carbon_limit(&self) -> Result<Option<u32>> {
        self.resource().get_u32("carbonLimit").optional()
    }

    pub fn relative_reasoning(&self) -> Result<Option<RelativeReasoning>> {
        self.resource()
            .materialize_one("relativeReasoning")
            .optional()
    }

    pub fn normalization_rules(&self) -> Result<Vec<NormalizationRule>> {
        Ok(self
            .resource()
            .get_as("normalizationRules")
            .optional()?
            .unwrap_or_default())
    }
}

impl RelativeReasoning {
    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    /// Packages the model was trained on.
    pub fn packages(&self) -> Result<Vec<Package>> {
        self.resource().materialize_nested("packages")
    }

    pub fn evaluation_packages(&self) -> Result<Vec<Package>> {
        Ok(self
            .resource()
            .materialize_nested("evalPackages")
            .optional()?
            .unwrap_or_default())
    }

    pub fn model_kind(&self) -> Result<ModelKind> {
        let raw = self.resource().get_str("modelType")?;
        ModelKind::parse(&raw).ok_or(ModelError::UnexpectedValue {
            kind: ResourceKind::RelativeReasoning,
            field: "modelType".to_string(),
            expected: "one of RULEBASED, ECC, MLCBMAD",
        })
    }

    /// Probability above which a rule application is accepted.
    pub fn threshold(&self) -> Result<f64> {
        self.resource().get_f64("threshold")
    }

    pub fn applicability_domain(&self) -> Result<Option<ApplicabilityDomain>> {
        self.resource()
            .materialize_one("applicabilityDomain")
            .optional()
    }
}

impl ApplicabilityDomain {
    pub fn num_neighbours(&self) -> Result<u32> {
        self.resource().get_u32("numNeighbours")
    }

    pub fn reliability_threshold(&self) -> Result<f64> {
        self.resource().get_f64("reliabilityThreshold")
    }

    pub fn local_compatibility_threshold(&self) -> Result<f64> {
        self.resource().get_f64("localCompatibilityThreshold")
    }
}
