//! The transport boundary.
//!
//! Everything the model knows about the remote service goes through
//! [`ResourceFetcher`]. Implementations own caching, retries and
//! authentication; the model itself performs none of those.

use crate::error::TransportError;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Flat attribute map of one resource, as returned by the service.
pub type Attributes = Map<String, Value>;

/// Form fields of a create or submit request. Keys may repeat.
pub type FormPayload = Vec<(String, String)>;

pub trait ResourceFetcher: Send + Sync {
    /// Host prefix (with trailing slash) used for top-level collections.
    fn base_url(&self) -> &str;

    /// Full attribute set of the resource named by `uri`.
    fn fetch(&self, uri: &str) -> Result<Attributes, TransportError>;

    fn delete(&self, uri: &str) -> Result<(), TransportError>;

    /// Creates a resource under the collection `endpoint` and returns the new
    /// identifier.
    fn create(&self, endpoint: &str, payload: &[(String, String)]) -> Result<String, TransportError>;

    /// Posts a form to `uri` and returns the raw response body.
    fn submit(&self, uri: &str, payload: &[(String, String)]) -> Result<String, TransportError>;
}

pub type SharedFetcher = Arc<dyn ResourceFetcher>;

/// Builds a form payload from borrowed pairs, skipping absent optional
/// values.
pub(crate) fn form<'a>(fields: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> FormPayload {
    fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.to_string())))
        .collect()
}
