//! Resource kinds and the REST collections they live under.

use serde::{Deserialize, Serialize};
use std::fmt;

/// REST collection segment of a resource kind (`<parent>/<endpoint>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    User,
    Package,
    Compound,
    Pathway,
    Reaction,
    Rule,
    Scenario,
    Setting,
    Group,
    #[serde(rename = "structure")]
    CompoundStructure,
    RelativeReasoning,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::User => "user",
            Endpoint::Package => "package",
            Endpoint::Compound => "compound",
            Endpoint::Pathway => "pathway",
            Endpoint::Reaction => "reaction",
            Endpoint::Rule => "rule",
            Endpoint::Scenario => "scenario",
            Endpoint::Setting => "setting",
            Endpoint::Group => "group",
            Endpoint::CompoundStructure => "structure",
            Endpoint::RelativeReasoning => "relative-reasoning",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete kind of a resource object.
///
/// Two objects are only equal when both their identifiers and their kinds
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Package,
    Compound,
    CompoundStructure,
    Reaction,
    SimpleRule,
    SequentialCompositeRule,
    ParallelCompositeRule,
    Pathway,
    Node,
    Edge,
    Scenario,
    Setting,
    User,
    Group,
    RelativeReasoning,
    ApplicabilityDomain,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Package => "Package",
            ResourceKind::Compound => "Compound",
            ResourceKind::CompoundStructure => "CompoundStructure",
            ResourceKind::Reaction => "Reaction",
            ResourceKind::SimpleRule => "SimpleRule",
            ResourceKind::SequentialCompositeRule => "SequentialCompositeRule",
            ResourceKind::ParallelCompositeRule => "ParallelCompositeRule",
            ResourceKind::Pathway => "Pathway",
            ResourceKind::Node => "Node",
            ResourceKind::Edge => "Edge",
            ResourceKind::Scenario => "Scenario",
            ResourceKind::Setting => "Setting",
            ResourceKind::User => "User",
            ResourceKind::Group => "Group",
            ResourceKind::RelativeReasoning => "RelativeReasoning",
            ResourceKind::ApplicabilityDomain => "ApplicabilityDomain",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Model family of a relative-reasoning classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "RULEBASED")]
    RuleBased,
    #[serde(rename = "ECC")]
    Ecc,
    #[serde(rename = "MLCBMAD")]
    Mlcbmad,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::RuleBased => "RULEBASED",
            ModelKind::Ecc => "ECC",
            ModelKind::Mlcbmad => "MLCBMAD",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "RULEBASED" => Some(ModelKind::RuleBased),
            "ECC" => Some(ModelKind::Ecc),
            "MLCBMAD" => Some(ModelKind::Mlcbmad),
            _ => None,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_render_as_collection_segments() {
        assert_eq!(Endpoint::User.as_str(), "user");
        assert_eq!(Endpoint::CompoundStructure.as_str(), "structure");
        assert_eq!(Endpoint::RelativeReasoning.to_string(), "relative-reasoning");
    }

    #[test]
    fn model_kind_parses_case_insensitively() {
        assert_eq!(ModelKind::parse("ecc"), Some(ModelKind::Ecc));
        assert_eq!(ModelKind::parse("RULEBASED"), Some(ModelKind::RuleBased));
        assert_eq!(ModelKind::parse("svm"), None);
        assert_eq!(
            serde_json::to_string(&ModelKind::Mlcbmad).unwrap(),
            "\"MLCBMAD\""
        );
    }
}
