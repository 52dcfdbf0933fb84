//! Pathways: directed graphs of compound nodes joined by reaction edges.

use crate::account::Scenario;
use crate::compound::{CompoundStructure, HalfLife};
use crate::endpoint::Endpoint;
use crate::error::{OptionalExt, Result};
use crate::fetcher::form;
use crate::package::Package;
use crate::reaction::{EcNumber, Reaction};
use crate::resource::{resource_type, FromRecord, ResourceType};
use crate::rule::Rule;
use crate::setting::Setting;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashSet;

resource_type! {
    /// A predicted or curated pathway.
    Pathway => Pathway, name_field = "pathwayName"
}

resource_type! {
    /// A compound occurrence at some depth of a pathway.
    Node => Node
}

resource_type! {
    /// A reaction step from a set of start nodes to a set of end nodes.
    Edge => Edge
}

/// Options for [`Pathway::create`].
#[derive(Debug, Clone, Default)]
pub struct PathwayRequest<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    /// Only store the root node instead of predicting from it.
    pub root_only: bool,
    /// Setting to predict with; the service default when absent.
    pub setting: Option<&'a Setting>,
}

impl Pathway {
    /// Creates a pathway rooted at `smiles` in `package`. Unless
    /// `root_only` is set the service starts predicting right away; poll
    /// [`Pathway::is_completed`] on a fresh instance to follow it.
    pub fn create(package: &Package, smiles: &str, request: &PathwayRequest<'_>) -> Result<Pathway> {
        let setting_id = match request.setting {
            Some(setting) => Some(setting.id()?),
            None => None,
        };
        let payload = form([
            ("smilesinput", Some(smiles)),
            ("name", request.name),
            ("description", request.description),
            ("rootOnly", Some(if request.root_only { "true" } else { "false" })),
            ("selectedSetting", setting_id),
        ]);
        package.resource().create_child(Endpoint::Pathway, &payload)
    }

    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    pub fn nodes(&self) -> Result<Vec<Node>> {
        self.resource().materialize_nested("nodes")
    }

    pub fn edges(&self) -> Result<Vec<Edge>> {
        self.resource().materialize_nested("links")
    }

    /// The service reports completion as the string `"true"`.
    pub fn is_completed(&self) -> Result<bool> {
        self.resource().get_flag("completed")
    }

    pub fn is_up_to_date(&self) -> Result<bool> {
        self.resource().get_flag("upToDate")
    }

    pub fn last_modified(&self) -> Result<DateTime<Utc>> {
        self.resource().get_timestamp("lastModified")
    }

    /// Nodes that no edge ends at.
    pub fn root_nodes(&self) -> Result<Vec<Node>> {
        let mut reached = HashSet::new();
        for edge in self.edges()? {
            reached.extend(edge.end_nodes()?);
        }
        Ok(self
            .nodes()?
            .into_iter()
            .filter(|node| !reached.contains(node))
            .collect())
    }

    pub fn nodes_at_depth(&self, depth: u32) -> Result<Vec<Node>> {
        let mut found = Vec::new();
        for node in self.nodes()? {
            if node.depth()? == depth {
                found.push(node);
            }
        }
        Ok(found)
    }
}

impl Node {
    /// Distance from the pathway root.
    pub fn depth(&self) -> Result<u32> {
        self.resource().get_u32("depth")
    }

    pub fn smiles(&self) -> Result<String> {
        self.resource().get_str("smiles")
    }

    pub fn default_structure(&self) -> Result<CompoundStructure> {
        self.resource().materialize_one("defaultStructure")
    }

    pub fn halflifes(&self) -> Result<Vec<HalfLife>> {
        Ok(self
            .resource()
            .get_as("halflifes")
            .optional()?
            .unwrap_or_default())
    }

    /// Scenarios holding values proposed for this node.
    pub fn proposed_values(&self) -> Result<Vec<Scenario>> {
        Ok(self
            .resource()
            .materialize_nested("proposedValues")
            .optional()?
            .unwrap_or_default())
    }
}

impl Edge {
    pub fn start_nodes(&self) -> Result<Vec<Node>> {
        self.resource().materialize_nested("startNodes")
    }

    pub fn end_nodes(&self) -> Result<Vec<Node>> {
        self.resource().materialize_nested("endNodes")
    }

    /// The reaction behind this edge, seeded with its name.
    pub fn reaction(&self) -> Result<Reaction> {
        let uri = self.resource().get_str("reactionURI")?;
        let mut record = json!({ "id": uri });
        if let Some(Value::String(name)) = self.resource().cached("reactionName") {
            record["name"] = Value::String(name);
        }
        Reaction::from_record(self.resource().fetcher(), &record)
    }

    pub fn reaction_name(&self) -> Result<String> {
        self.resource().get_str("reactionName")
    }

    pub fn ec_numbers(&self) -> Result<Vec<EcNumber>> {
        Ok(self
            .resource()
            .get_as("ecNumbers")
            .optional()?
            .unwrap_or_default())
    }

    /// Rules of the underlying reaction.
    pub fn rules(&self) -> Result<Vec<Rule>> {
        self.reaction()?.rules()
    }
}
