//! enviPath resource model
//!
//! Typed, lazily hydrated client-side objects for the resources of an
//! enviPath instance (packages, compounds, reactions, rules, pathways, ...).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  EnviPath: top-level users, groups, packages, settings       │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  Typed catalog: Package, Compound, Reaction, Rule, Pathway…  │
//! │        │ typed accessors, nested materialization             │
//! │        ▼                                                     │
//! │  Resource: identifier + attribute cache, hydrate-once        │
//! │        │ fetch / delete / create / submit                    │
//! │        ▼                                                     │
//! │  ResourceFetcher (HTTP, in-memory, ...)                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Objects compare and hash by identifier, so nodes and edges taken from two
//! independently hydrated pathways line up in hash maps and sets.
//!
//! ```
//! use envipath_model::{MemoryFetcher, Pathway, ResourceType, SharedFetcher};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryFetcher::new("http://localhost:8080/"));
//! memory.insert("pw/1", json!({"pathwayName": "Ethanol", "completed": "true"}));
//! let fetcher: SharedFetcher = memory.clone();
//!
//! let pathway = Pathway::new(fetcher, "pw/1");
//! assert_eq!(pathway.name().unwrap(), "Ethanol");
//! assert!(pathway.is_completed().unwrap());
//! assert_eq!(memory.fetch_count("pw/1"), 1);
//! ```

pub mod account;
pub mod compound;
pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod instance;
pub mod memory;
pub mod package;
pub mod pathway;
pub mod reaction;
pub mod resource;
pub mod rule;
pub mod setting;

pub use account::{Group, Scenario, User};
pub use compound::{Compound, CompoundStructure, HalfLife};
pub use endpoint::{Endpoint, ModelKind, ResourceKind};
pub use error::{ModelError, OptionalExt, Result, TransportError};
pub use fetcher::{Attributes, FormPayload, ResourceFetcher, SharedFetcher};
pub use instance::EnviPath;
pub use memory::{MemoryFetcher, RecordedCall};
pub use package::Package;
pub use pathway::{Edge, Node, Pathway, PathwayRequest};
pub use reaction::{EcNumber, Reaction};
pub use resource::{FromRecord, Hydration, Resource, ResourceType};
pub use rule::{ParallelCompositeRule, Rule, RuleKind, SequentialCompositeRule, SimpleRule};
pub use setting::{ApplicabilityDomain, NormalizationRule, RelativeReasoning, Setting};
