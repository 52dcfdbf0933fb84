//! Lazily hydrated resource objects.
//!
//! A [`Resource`] is an identifier plus a cache of attributes. Objects are
//! usually created from a parent's nested JSON and only carry a partial seed
//! (`id`, `name`). The first read of an attribute that is not cached fetches
//! the full attribute set once; every later read is served from the cache.
//!
//! ```text
//!   Unhydrated ──(first miss: fetch + merge)──► Hydrated
//!        │                                         │
//!        └──────────────── delete() ───────────────┴──► invalidated (id cleared)
//! ```
//!
//! Identity is the identifier: equality compares identifier and kind, hashing
//! uses the identifier only. There is no identity map; two objects for the
//! same identifier hydrate independently and may observe different snapshots.
//!
//! A deleted object keeps its former identifier for identity only. It equals
//! its own clones, never a live object, and two deleted objects with distinct
//! former identifiers stay distinct.

use crate::endpoint::{Endpoint, ResourceKind};
use crate::error::{ModelError, Result};
use crate::fetcher::{Attributes, SharedFetcher};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    Unhydrated,
    Hydrated,
}

struct Cache {
    attributes: Attributes,
    hydration: Hydration,
}

pub struct Resource {
    kind: ResourceKind,
    id: String,
    deleted: bool,
    fetcher: SharedFetcher,
    cache: Mutex<Cache>,
}

impl Resource {
    pub fn new(kind: ResourceKind, fetcher: SharedFetcher, id: impl Into<String>) -> Self {
        Self::with_cache(kind, fetcher, id.into(), Attributes::new(), Hydration::Unhydrated)
    }

    /// Object pre-populated with a partial attribute set; still hydrates on
    /// the first miss.
    pub fn seeded(
        kind: ResourceKind,
        fetcher: SharedFetcher,
        id: impl Into<String>,
        seed: Attributes,
    ) -> Self {
        Self::with_cache(kind, fetcher, id.into(), seed, Hydration::Unhydrated)
    }

    /// Object whose attributes were supplied in full; never fetches.
    pub fn hydrated(
        kind: ResourceKind,
        fetcher: SharedFetcher,
        id: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        Self::with_cache(kind, fetcher, id.into(), attributes, Hydration::Hydrated)
    }

    fn with_cache(
        kind: ResourceKind,
        fetcher: SharedFetcher,
        id: String,
        attributes: Attributes,
        hydration: Hydration,
    ) -> Self {
        Self {
            kind,
            id,
            deleted: false,
            fetcher,
            cache: Mutex::new(Cache {
                attributes,
                hydration,
            }),
        }
    }

    /// Seeds an object from a nested record such as `{"id": ..., "name": ...}`.
    pub fn from_record(kind: ResourceKind, fetcher: &SharedFetcher, record: &Value) -> Result<Self> {
        let Value::Object(map) = record else {
            return Err(ModelError::MalformedRecord {
                kind,
                reason: "expected a JSON object".to_string(),
            });
        };
        let id = map
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::MalformedRecord {
                kind,
                reason: "record has no string `id`".to_string(),
            })?;
        Ok(Self::seeded(kind, Arc::clone(fetcher), id, map.clone()))
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn id(&self) -> Result<&str> {
        if self.deleted {
            return Err(ModelError::Invalidated { kind: self.kind });
        }
        Ok(&self.id)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn fetcher(&self) -> &SharedFetcher {
        &self.fetcher
    }

    pub fn hydration(&self) -> Hydration {
        self.cache.lock().hydration
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydration() == Hydration::Hydrated
    }

    /// Cached value of `field`, without any I/O.
    pub fn cached(&self, field: &str) -> Option<Value> {
        self.cache.lock().attributes.get(field).cloned()
    }

    /// Value of `field`, hydrating first if it is not cached.
    ///
    /// `null` counts as absent. The cache lock is held across the fetch, so
    /// concurrent first reads on one object still fetch once.
    pub fn get(&self, field: &str) -> Result<Value> {
        let id = self.id()?;
        let mut cache = self.cache.lock();
        if let Some(value) = present(&cache.attributes, field) {
            return Ok(value);
        }
        if cache.hydration == Hydration::Unhydrated {
            let fetched = self.fetcher.fetch(id)?;
            tracing::debug!(kind = %self.kind, id, fields = fetched.len(), "hydrated resource");
            cache.attributes.extend(fetched);
            cache.hydration = Hydration::Hydrated;
            if let Some(value) = present(&cache.attributes, field) {
                return Ok(value);
            }
        }
        Err(self.missing(field))
    }

    pub fn get_str(&self, field: &str) -> Result<String> {
        match self.get(field)? {
            Value::String(s) => Ok(s),
            _ => Err(self.unexpected(field, "a string")),
        }
    }

    /// Boolean flag. The service encodes most flags as the string `"true"`;
    /// any other string reads as `false`.
    pub fn get_flag(&self, field: &str) -> Result<bool> {
        match self.get(field)? {
            Value::Bool(b) => Ok(b),
            Value::String(s) => Ok(s == "true"),
            _ => Err(self.unexpected(field, "a boolean flag")),
        }
    }

    pub fn get_u32(&self, field: &str) -> Result<u32> {
        let value = self.get(field)?;
        let parsed = match &value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.unexpected(field, "an unsigned integer"))
    }

    pub fn get_f64(&self, field: &str) -> Result<f64> {
        let value = self.get(field)?;
        let parsed = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.unexpected(field, "a number"))
    }

    pub fn get_list(&self, field: &str) -> Result<Vec<Value>> {
        match self.get(field)? {
            Value::Array(items) => Ok(items),
            _ => Err(self.unexpected(field, "a list")),
        }
    }

    /// Timestamp given either as epoch milliseconds or RFC 3339 text.
    pub fn get_timestamp(&self, field: &str) -> Result<DateTime<Utc>> {
        let value = self.get(field)?;
        let parsed = match &value {
            Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(millis) => DateTime::<Utc>::from_timestamp_millis(millis),
                Err(_) => DateTime::parse_from_rfc3339(s.trim())
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            },
            _ => None,
        };
        parsed.ok_or_else(|| self.unexpected(field, "a timestamp"))
    }

    /// Deserializes `field` into a plain data type.
    pub fn get_as<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        let value = self.get(field)?;
        serde_json::from_value(value).map_err(|_| self.unexpected(field, std::any::type_name::<T>()))
    }

    /// Builds one `T` per partial record in the list stored under `field`.
    pub fn materialize_nested<T: FromRecord>(&self, field: &str) -> Result<Vec<T>> {
        self.get_list(field)?
            .iter()
            .map(|record| T::from_record(&self.fetcher, record))
            .collect()
    }

    /// Builds a `T` from the single record stored under `field`.
    pub fn materialize_one<T: FromRecord>(&self, field: &str) -> Result<T> {
        let record = self.get(field)?;
        T::from_record(&self.fetcher, &record)
    }

    /// Fetches the `<id>/<endpoint>` listing and materializes its entries.
    pub fn list_children<T: FromRecord>(&self, endpoint: Endpoint) -> Result<Vec<T>> {
        let uri = self.child_uri(endpoint)?;
        list_collection(&self.fetcher, &uri, endpoint, self.kind)
    }

    pub fn child_uri(&self, endpoint: Endpoint) -> Result<String> {
        Ok(format!("{}/{}", self.id()?.trim_end_matches('/'), endpoint))
    }

    /// Raw attribute map straight from the fetcher. Bypasses the cache and
    /// leaves it untouched.
    pub fn fetch_json(&self) -> Result<Attributes> {
        Ok(self.fetcher.fetch(self.id()?)?)
    }

    /// Posts a form to this resource and returns the response body.
    pub fn submit(&self, payload: &[(String, String)]) -> Result<String> {
        Ok(self.fetcher.submit(self.id()?, payload)?)
    }

    /// Deletes the remote resource, then invalidates the identifier and clears
    /// the cache.
    ///
    /// Nothing changes locally unless the remote delete succeeded.
    pub fn delete(&mut self) -> Result<()> {
        let id = self.id()?;
        self.fetcher.delete(id)?;
        tracing::debug!(kind = %self.kind, id, "deleted resource");
        self.deleted = true;
        let cache = self.cache.get_mut();
        cache.attributes.clear();
        cache.hydration = Hydration::Unhydrated;
        Ok(())
    }

    /// Creates a child under `<id>/<endpoint>` and returns it unhydrated.
    pub(crate) fn create_child<T: ResourceType>(
        &self,
        endpoint: Endpoint,
        payload: &[(String, String)],
    ) -> Result<T> {
        let uri = self.child_uri(endpoint)?;
        let id = self.fetcher.create(&uri, payload)?;
        tracing::debug!(kind = %T::KIND, %id, "created resource");
        Ok(T::new(Arc::clone(&self.fetcher), id))
    }

    pub(crate) fn missing(&self, field: &str) -> ModelError {
        ModelError::MissingProperty {
            kind: self.kind,
            field: field.to_string(),
        }
    }

    fn unexpected(&self, field: &str, expected: &'static str) -> ModelError {
        ModelError::UnexpectedValue {
            kind: self.kind,
            field: field.to_string(),
            expected,
        }
    }

    pub(crate) fn describe(&self, name_field: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.cached(name_field) {
            Some(Value::String(name)) => name,
            _ => String::new(),
        };
        write!(
            f,
            "{}: {} ({})",
            self.kind,
            name,
            if self.deleted { "<deleted>" } else { self.id.as_str() }
        )
    }
}

/// Fetches the listing at `uri` and materializes the records stored under
/// the `endpoint` key. Errors name `owner` as the kind lacking the list.
pub(crate) fn list_collection<T: FromRecord>(
    fetcher: &SharedFetcher,
    uri: &str,
    endpoint: Endpoint,
    owner: ResourceKind,
) -> Result<Vec<T>> {
    let mut listing = fetcher.fetch(uri)?;
    let items = match listing.remove(endpoint.as_str()) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ModelError::UnexpectedValue {
                kind: owner,
                field: endpoint.to_string(),
                expected: "a list",
            })
        }
        None => {
            return Err(ModelError::MissingProperty {
                kind: owner,
                field: endpoint.to_string(),
            })
        }
    };
    tracing::debug!(kind = %owner, %endpoint, count = items.len(), "listed collection");
    items
        .iter()
        .map(|record| T::from_record(fetcher, record))
        .collect()
}

fn present(attributes: &Attributes, field: &str) -> Option<Value> {
    attributes.get(field).filter(|v| !v.is_null()).cloned()
}

/// Clones carry a snapshot of the cache and hydrate independently from then
/// on.
impl Clone for Resource {
    fn clone(&self) -> Self {
        let cache = self.cache.lock();
        Self {
            kind: self.kind,
            id: self.id.clone(),
            deleted: self.deleted,
            fetcher: Arc::clone(&self.fetcher),
            cache: Mutex::new(Cache {
                attributes: cache.attributes.clone(),
                hydration: cache.hydration,
            }),
        }
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.deleted == other.deleted && self.id == other.id
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("deleted", &self.deleted)
            .field("hydration", &self.hydration())
            .finish()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe("name", f)
    }
}

/// A typed view over a [`Resource`] of one fixed kind.
pub trait ResourceType: Sized {
    const KIND: ResourceKind;

    /// Attribute holding the display name.
    const NAME_FIELD: &'static str = "name";

    /// Wraps `resource` without checking its kind; prefer [`ResourceType::cast`].
    fn wrap(resource: Resource) -> Self;

    fn resource(&self) -> &Resource;

    fn resource_mut(&mut self) -> &mut Resource;

    fn into_resource(self) -> Resource;

    fn new(fetcher: SharedFetcher, id: impl Into<String>) -> Self {
        Self::wrap(Resource::new(Self::KIND, fetcher, id))
    }

    /// Converts a generically held resource, failing when its kind differs.
    fn cast(resource: Resource) -> Result<Self> {
        if resource.kind() != Self::KIND {
            return Err(ModelError::InvalidParent {
                expected: Self::KIND,
                actual: resource.kind(),
            });
        }
        Ok(Self::wrap(resource))
    }

    fn id(&self) -> Result<&str> {
        self.resource().id()
    }

    fn name(&self) -> Result<String> {
        self.resource().get_str(Self::NAME_FIELD)
    }

    fn get_json(&self) -> Result<Attributes> {
        self.resource().fetch_json()
    }

    fn delete(&mut self) -> Result<()> {
        self.resource_mut().delete()
    }
}

/// Construction from a nested partial record.
pub trait FromRecord: Sized {
    fn from_record(fetcher: &SharedFetcher, record: &Value) -> Result<Self>;
}

impl<T: ResourceType> FromRecord for T {
    fn from_record(fetcher: &SharedFetcher, record: &Value) -> Result<Self> {
        Resource::from_record(T::KIND, fetcher, record).map(T::wrap)
    }
}

/// Declares a typed resource wrapper.
macro_rules! resource_type {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        resource_type!($(#[$meta])* $name => $kind, name_field = "name");
    };
    ($(#[$meta:meta])* $name:ident => $kind:ident, name_field = $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            resource: $crate::resource::Resource,
        }

        impl $crate::resource::ResourceType for $name {
            const KIND: $crate::endpoint::ResourceKind = $crate::endpoint::ResourceKind::$kind;
            const NAME_FIELD: &'static str = $field;

            fn wrap(resource: $crate::resource::Resource) -> Self {
                Self { resource }
            }

            fn resource(&self) -> &$crate::resource::Resource {
                &self.resource
            }

            fn resource_mut(&mut self) -> &mut $crate::resource::Resource {
                &mut self.resource
            }

            fn into_resource(self) -> $crate::resource::Resource {
                self.resource
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.resource.describe($field, f)
            }
        }
    };
}

pub(crate) use resource_type;
