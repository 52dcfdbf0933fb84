//! Reactions.

use crate::compound::CompoundStructure;
use crate::error::{OptionalExt, Result};
use crate::pathway::Pathway;
use crate::resource::{resource_type, ResourceType};
use crate::rule::Rule;
use serde::{Deserialize, Serialize};

resource_type! {
    /// Transformation of educt structures into product structures, optionally
    /// backed by the rules that produce it.
    Reaction => Reaction
}

/// Enzyme Commission cross-reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EcNumber {
    #[serde(rename = "ecNumber")]
    pub number: String,
    #[serde(rename = "ecName", default)]
    pub name: Option<String>,
}

impl Reaction {
    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    pub fn smirks(&self) -> Result<String> {
        self.resource().get_str("smirks")
    }

    pub fn is_multistep(&self) -> Result<bool> {
        Ok(self
            .resource()
            .get_flag("multistep")
            .optional()?
            .unwrap_or(false))
    }

    pub fn educts(&self) -> Result<Vec<CompoundStructure>> {
        self.resource().materialize_nested("educts")
    }

    pub fn products(&self) -> Result<Vec<CompoundStructure>> {
        self.resource().materialize_nested("products")
    }

    /// Rules attached to the reaction, each resolved to its variant. Manually
    /// curated reactions have none.
    pub fn rules(&self) -> Result<Vec<Rule>> {
        Ok(self
            .resource()
            .materialize_nested("rules")
            .optional()?
            .unwrap_or_default())
    }

    pub fn ec_numbers(&self) -> Result<Vec<EcNumber>> {
        Ok(self
            .resource()
            .get_as("ecNumbers")
            .optional()?
            .unwrap_or_default())
    }

    /// Pathways the reaction appears in.
    pub fn pathways(&self) -> Result<Vec<Pathway>> {
        Ok(self
            .resource()
            .materialize_nested("pathways")
            .optional()?
            .unwrap_or_default())
    }
}
