//! Users, groups and scenarios.

use crate::endpoint::Endpoint;
use crate::error::{OptionalExt, Result};
use crate::fetcher::form;
use crate::package::Package;
use crate::resource::{resource_type, ResourceType};

resource_type! {
    User => User
}

resource_type! {
    Group => Group
}

resource_type! {
    /// Environmental conditions of an experiment (soil, sludge, ...).
    Scenario => Scenario
}

impl User {
    pub fn email(&self) -> Result<String> {
        self.resource().get_str("email")
    }

    pub fn groups(&self) -> Result<Vec<Group>> {
        Ok(self
            .resource()
            .materialize_nested("groups")
            .optional()?
            .unwrap_or_default())
    }
}

impl Group {
    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }
}

impl Scenario {
    pub fn create(
        package: &Package,
        name: &str,
        description: Option<&str>,
        date: Option<&str>,
        scenario_type: Option<&str>,
    ) -> Result<Scenario> {
        let payload = form([
            ("studyname", Some(name)),
            ("studydescription", description),
            ("date", date),
            ("type", scenario_type),
        ]);
        package.resource().create_child(Endpoint::Scenario, &payload)
    }

    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    pub fn date(&self) -> Result<String> {
        self.resource().get_str("date")
    }

    pub fn scenario_type(&self) -> Result<String> {
        self.resource().get_str("type")
    }
}
