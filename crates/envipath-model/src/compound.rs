//! Compounds and their structures.

use crate::endpoint::Endpoint;
use crate::error::{ModelError, OptionalExt, Result};
use crate::fetcher::form;
use crate::package::Package;
use crate::resource::{resource_type, ResourceType};
use serde::{Deserialize, Serialize};

resource_type! {
    /// A compound groups one or more structures, exactly one of which is
    /// normally flagged as the default.
    Compound => Compound
}

resource_type! {
    CompoundStructure => CompoundStructure
}

/// Half-life observation attached to a structure or a pathway node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfLife {
    #[serde(default)]
    pub scenario_name: Option<String>,
    #[serde(default)]
    pub scenario_id: Option<String>,
    /// Half-life as reported, e.g. `"3.5 - 7.0"` days.
    #[serde(default, rename = "hl")]
    pub halflife: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub fit: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl Compound {
    pub fn create(
        package: &Package,
        smiles: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Compound> {
        let payload = form([
            ("compoundSmiles", Some(smiles)),
            ("compoundName", name),
            ("compoundDescription", description),
        ]);
        package.resource().create_child(Endpoint::Compound, &payload)
    }

    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    /// Structures embedded in the compound record.
    pub fn structures(&self) -> Result<Vec<CompoundStructure>> {
        self.resource().materialize_nested("structures")
    }

    /// Structures from the compound's `structure` listing.
    pub fn list_structures(&self) -> Result<Vec<CompoundStructure>> {
        self.resource().list_children(Endpoint::CompoundStructure)
    }

    /// The structure flagged as default.
    ///
    /// Zero flagged structures is an error; if several are flagged the first
    /// wins.
    pub fn default_structure(&self) -> Result<CompoundStructure> {
        let mut defaults = Vec::new();
        for structure in self.structures()? {
            if structure.is_default_structure()? {
                defaults.push(structure);
            }
        }
        if defaults.len() > 1 {
            tracing::warn!(
                compound = self.id()?,
                count = defaults.len(),
                "compound has more than one default structure"
            );
        }
        defaults
            .into_iter()
            .next()
            .ok_or_else(|| match self.id() {
                Ok(id) => ModelError::NoDefaultStructure(id.to_string()),
                Err(err) => err,
            })
    }
}

impl CompoundStructure {
    pub fn create(
        compound: &Compound,
        smiles: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<CompoundStructure> {
        let payload = form([
            ("smiles", Some(smiles)),
            ("name", name),
            ("description", description),
        ]);
        compound
            .resource()
            .create_child(Endpoint::CompoundStructure, &payload)
    }

    pub fn smiles(&self) -> Result<String> {
        self.resource().get_str("smiles")
    }

    pub fn inchi(&self) -> Result<String> {
        self.resource().get_str("InChI")
    }

    pub fn formula(&self) -> Result<String> {
        self.resource().get_str("formula")
    }

    pub fn charge(&self) -> Result<f64> {
        self.resource().get_f64("charge")
    }

    pub fn mass(&self) -> Result<f64> {
        self.resource().get_f64("mass")
    }

    /// Absent flag reads as `false`.
    pub fn is_default_structure(&self) -> Result<bool> {
        Ok(self
            .resource()
            .get_flag("isDefaultStructure")
            .optional()?
            .unwrap_or(false))
    }

    pub fn halflifes(&self) -> Result<Vec<HalfLife>> {
        Ok(self
            .resource()
            .get_as("halflifes")
            .optional()?
            .unwrap_or_default())
    }
}
