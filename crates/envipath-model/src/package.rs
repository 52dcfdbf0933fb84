//! Packages: the top-level containers of enviPath data.

use crate::account::{Group, Scenario};
use crate::compound::Compound;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::fetcher::{form, SharedFetcher};
use crate::pathway::Pathway;
use crate::reaction::Reaction;
use crate::resource::{resource_type, ResourceType};
use crate::rule::Rule;
use crate::setting::RelativeReasoning;
use std::sync::Arc;

resource_type! {
    /// A package owns compounds, rules, reactions, pathways, scenarios and
    /// relative-reasoning models on the remote side.
    Package => Package
}

impl Package {
    /// Creates a package owned by `group`.
    pub fn create(
        fetcher: &SharedFetcher,
        group: &Group,
        name: &str,
        description: Option<&str>,
    ) -> Result<Package> {
        let endpoint = format!("{}{}", fetcher.base_url(), Endpoint::Package);
        let payload = form([
            ("groupURI", Some(group.id()?)),
            ("packageName", Some(name)),
            ("packageDescription", description),
        ]);
        let id = fetcher.create(&endpoint, &payload)?;
        tracing::debug!(%id, "created package");
        Ok(Package::new(Arc::clone(fetcher), id))
    }

    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    pub fn compounds(&self) -> Result<Vec<Compound>> {
        self.resource().list_children(Endpoint::Compound)
    }

    /// All rules, each resolved to its concrete variant.
    pub fn rules(&self) -> Result<Vec<Rule>> {
        self.resource().list_children(Endpoint::Rule)
    }

    pub fn reactions(&self) -> Result<Vec<Reaction>> {
        self.resource().list_children(Endpoint::Reaction)
    }

    pub fn pathways(&self) -> Result<Vec<Pathway>> {
        self.resource().list_children(Endpoint::Pathway)
    }

    pub fn scenarios(&self) -> Result<Vec<Scenario>> {
        self.resource().list_children(Endpoint::Scenario)
    }

    pub fn relative_reasonings(&self) -> Result<Vec<RelativeReasoning>> {
        self.resource().list_children(Endpoint::RelativeReasoning)
    }
}
