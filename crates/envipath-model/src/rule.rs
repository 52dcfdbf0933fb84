//! Transformation rules.
//!
//! The remote service returns every rule in the same generic shape and names
//! its concrete kind in the `identifier` discriminator. [`Rule`] is the closed
//! set of variants; [`Rule::from_attributes`] decodes the discriminator and
//! rejects unknown tags.

use crate::endpoint::{Endpoint, ResourceKind};
use crate::error::{ModelError, Result};
use crate::fetcher::{form, Attributes, FormPayload, SharedFetcher};
use crate::package::Package;
use crate::resource::{resource_type, FromRecord, Resource, ResourceType};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Attribute carrying the rule discriminator.
pub const RULE_DISCRIMINATOR: &str = "identifier";

resource_type! {
    /// A single SMIRKS transformation.
    SimpleRule => SimpleRule
}

resource_type! {
    /// Simple rules applied one after another.
    SequentialCompositeRule => SequentialCompositeRule
}

resource_type! {
    /// Simple rules applied independently of each other.
    ParallelCompositeRule => ParallelCompositeRule
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Simple,
    Sequential,
    Parallel,
}

impl RuleKind {
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "simple-rule" => Ok(RuleKind::Simple),
            "sequential-rule" => Ok(RuleKind::Sequential),
            "parallel-rule" => Ok(RuleKind::Parallel),
            other => Err(ModelError::UnknownRuleType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Simple => "simple-rule",
            RuleKind::Sequential => "sequential-rule",
            RuleKind::Parallel => "parallel-rule",
        }
    }

    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            RuleKind::Simple => ResourceKind::SimpleRule,
            RuleKind::Sequential => ResourceKind::SequentialCompositeRule,
            RuleKind::Parallel => ResourceKind::ParallelCompositeRule,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    Simple(SimpleRule),
    Sequential(SequentialCompositeRule),
    Parallel(ParallelCompositeRule),
}

impl Rule {
    /// Builds the variant named by the discriminator in `attributes`.
    ///
    /// `attributes` seeds the new object. It counts as fully hydrated only
    /// when `complete` is set.
    pub fn from_attributes(
        fetcher: &SharedFetcher,
        id: &str,
        attributes: Attributes,
        complete: bool,
    ) -> Result<Rule> {
        let tag = match attributes.get(RULE_DISCRIMINATOR) {
            Some(Value::String(tag)) => tag.clone(),
            Some(_) => {
                return Err(ModelError::UnexpectedValue {
                    kind: ResourceKind::SimpleRule,
                    field: RULE_DISCRIMINATOR.to_string(),
                    expected: "a rule type tag",
                })
            }
            None => {
                return Err(ModelError::MissingProperty {
                    kind: ResourceKind::SimpleRule,
                    field: RULE_DISCRIMINATOR.to_string(),
                })
            }
        };
        let kind = RuleKind::parse(&tag)?;
        let fetcher = Arc::clone(fetcher);
        let resource = if complete {
            Resource::hydrated(kind.resource_kind(), fetcher, id, attributes)
        } else {
            Resource::seeded(kind.resource_kind(), fetcher, id, attributes)
        };
        Ok(Rule::wrap(kind, resource))
    }

    /// Fetches the rule at `id` and resolves its variant.
    pub fn resolve(fetcher: &SharedFetcher, id: &str) -> Result<Rule> {
        let attributes = fetcher.fetch(id)?;
        Rule::from_attributes(fetcher, id, attributes, true)
    }

    fn wrap(kind: RuleKind, resource: Resource) -> Rule {
        match kind {
            RuleKind::Simple => Rule::Simple(SimpleRule::wrap(resource)),
            RuleKind::Sequential => Rule::Sequential(SequentialCompositeRule::wrap(resource)),
            RuleKind::Parallel => Rule::Parallel(ParallelCompositeRule::wrap(resource)),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Simple(_) => RuleKind::Simple,
            Rule::Sequential(_) => RuleKind::Sequential,
            Rule::Parallel(_) => RuleKind::Parallel,
        }
    }

    pub fn resource(&self) -> &Resource {
        match self {
            Rule::Simple(rule) => rule.resource(),
            Rule::Sequential(rule) => rule.resource(),
            Rule::Parallel(rule) => rule.resource(),
        }
    }

    fn resource_mut(&mut self) -> &mut Resource {
        match self {
            Rule::Simple(rule) => rule.resource_mut(),
            Rule::Sequential(rule) => rule.resource_mut(),
            Rule::Parallel(rule) => rule.resource_mut(),
        }
    }

    pub fn id(&self) -> Result<&str> {
        self.resource().id()
    }

    pub fn name(&self) -> Result<String> {
        self.resource().get_str("name")
    }

    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    pub fn is_composite(&self) -> bool {
        !matches!(self, Rule::Simple(_))
    }

    /// Component rules of a composite rule; `None` for a simple rule.
    pub fn simple_rules(&self) -> Option<Result<Vec<SimpleRule>>> {
        match self {
            Rule::Simple(_) => None,
            Rule::Sequential(rule) => Some(rule.simple_rules()),
            Rule::Parallel(rule) => Some(rule.simple_rules()),
        }
    }

    pub fn apply_to_smiles(&self, smiles: &str) -> Result<Vec<String>> {
        apply_to_smiles(self.resource(), smiles)
    }

    pub fn delete(&mut self) -> Result<()> {
        self.resource_mut().delete()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Simple(rule) => fmt::Display::fmt(rule, f),
            Rule::Sequential(rule) => fmt::Display::fmt(rule, f),
            Rule::Parallel(rule) => fmt::Display::fmt(rule, f),
        }
    }
}

/// Nested or listed rule records. Records without a discriminator are
/// fetched once to learn their kind.
impl FromRecord for Rule {
    fn from_record(fetcher: &SharedFetcher, record: &Value) -> Result<Self> {
        let Value::Object(map) = record else {
            return Err(ModelError::MalformedRecord {
                kind: ResourceKind::SimpleRule,
                reason: "expected a JSON object".to_string(),
            });
        };
        let id = map
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::MalformedRecord {
                kind: ResourceKind::SimpleRule,
                reason: "record has no string `id`".to_string(),
            })?;

        if map.contains_key(RULE_DISCRIMINATOR) {
            return Rule::from_attributes(fetcher, id, map.clone(), false);
        }

        tracing::debug!(id, "rule record has no discriminator, fetching");
        let mut attributes = map.clone();
        attributes.extend(fetcher.fetch(id)?);
        Rule::from_attributes(fetcher, id, attributes, true)
    }
}

impl From<SimpleRule> for Rule {
    fn from(rule: SimpleRule) -> Self {
        Rule::Simple(rule)
    }
}

impl From<SequentialCompositeRule> for Rule {
    fn from(rule: SequentialCompositeRule) -> Self {
        Rule::Sequential(rule)
    }
}

impl From<ParallelCompositeRule> for Rule {
    fn from(rule: ParallelCompositeRule) -> Self {
        Rule::Parallel(rule)
    }
}

/// Runs the rule remotely on `smiles` and returns the product structures.
///
/// The response is whitespace-separated SMILES; empty tokens are dropped.
/// No local validation of the input is done.
fn apply_to_smiles(rule: &Resource, smiles: &str) -> Result<Vec<String>> {
    let payload = form([("hiddenMethod", Some("APPLYRULES")), ("compound", Some(smiles))]);
    let body = rule.submit(&payload)?;
    Ok(body.split_whitespace().map(str::to_string).collect())
}

fn composite_payload(
    rule_type: &str,
    rules: &[SimpleRule],
    name: Option<&str>,
    description: Option<&str>,
) -> Result<FormPayload> {
    let mut payload = form([
        ("ruleType", Some(rule_type)),
        ("name", name),
        ("description", description),
    ]);
    for rule in rules {
        payload.push(("simpleRules".to_string(), rule.id()?.to_string()));
    }
    Ok(payload)
}

impl SimpleRule {
    pub fn create(
        package: &Package,
        smirks: &str,
        name: Option<&str>,
        description: Option<&str>,
        reactant_filter_smarts: Option<&str>,
        product_filter_smarts: Option<&str>,
    ) -> Result<SimpleRule> {
        let payload = form([
            ("smirks", Some(smirks)),
            ("name", name),
            ("description", description),
            ("reactantFilterSmarts", reactant_filter_smarts),
            ("productFilterSmarts", product_filter_smarts),
        ]);
        package.resource().create_child(Endpoint::Rule, &payload)
    }

    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    pub fn smirks(&self) -> Result<String> {
        self.resource().get_str("smirks")
    }

    pub fn reactant_filter_smarts(&self) -> Result<String> {
        self.resource().get_str("reactantFilterSmarts")
    }

    pub fn product_filter_smarts(&self) -> Result<String> {
        self.resource().get_str("productFilterSmarts")
    }

    pub fn apply_to_smiles(&self, smiles: &str) -> Result<Vec<String>> {
        apply_to_smiles(self.resource(), smiles)
    }
}

impl SequentialCompositeRule {
    pub fn create(
        package: &Package,
        rules: &[SimpleRule],
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<SequentialCompositeRule> {
        let payload = composite_payload("SEQUENTIAL", rules, name, description)?;
        package.resource().create_child(Endpoint::Rule, &payload)
    }

    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    /// Component rules in application order.
    pub fn simple_rules(&self) -> Result<Vec<SimpleRule>> {
        self.resource().materialize_nested("simpleRules")
    }

    pub fn apply_to_smiles(&self, smiles: &str) -> Result<Vec<String>> {
        apply_to_smiles(self.resource(), smiles)
    }
}

impl ParallelCompositeRule {
    pub fn create(
        package: &Package,
        rules: &[SimpleRule],
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<ParallelCompositeRule> {
        let payload = composite_payload("PARALLEL", rules, name, description)?;
        package.resource().create_child(Endpoint::Rule, &payload)
    }

    pub fn description(&self) -> Result<String> {
        self.resource().get_str("description")
    }

    /// Component rules; order carries no meaning.
    pub fn simple_rules(&self) -> Result<Vec<SimpleRule>> {
        self.resource().materialize_nested("simpleRules")
    }

    pub fn apply_to_smiles(&self, smiles: &str) -> Result<Vec<String>> {
        apply_to_smiles(self.resource(), smiles)
    }
}
