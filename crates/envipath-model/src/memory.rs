//! In-memory [`ResourceFetcher`].
//!
//! Holds attribute maps keyed by identifier and records every call made
//! against it. Backs the test suites and offline tooling.

use crate::error::TransportError;
use crate::fetcher::{Attributes, ResourceFetcher};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// A create or submit request seen by [`MemoryFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub uri: String,
    pub payload: Vec<(String, String)>,
}

#[derive(Default)]
struct MemoryState {
    resources: HashMap<String, Attributes>,
    responses: HashMap<String, String>,
    fetches: HashMap<String, usize>,
    deleted: Vec<String>,
    created: Vec<RecordedCall>,
    submitted: Vec<RecordedCall>,
    next_id: u64,
}

pub struct MemoryFetcher {
    base_url: String,
    state: Mutex<MemoryState>,
}

impl MemoryFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Stores `value` as the attribute set of `uri`, replacing any previous
    /// one. Non-object values are kept under a single `value` key.
    pub fn insert(&self, uri: impl Into<String>, value: Value) {
        let attributes = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Attributes::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self.state.lock().resources.insert(uri.into(), attributes);
    }

    /// Canned response body for submissions to `uri`.
    pub fn respond(&self, uri: impl Into<String>, body: impl Into<String>) {
        self.state.lock().responses.insert(uri.into(), body.into());
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.state.lock().resources.contains_key(uri)
    }

    pub fn fetch_count(&self, uri: &str) -> usize {
        self.state.lock().fetches.get(uri).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.state.lock().fetches.values().sum()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().deleted.clone()
    }

    pub fn created(&self) -> Vec<RecordedCall> {
        self.state.lock().created.clone()
    }

    pub fn submitted(&self) -> Vec<RecordedCall> {
        self.state.lock().submitted.clone()
    }

    fn not_found(uri: &str) -> TransportError {
        TransportError::Status {
            uri: uri.to_string(),
            status: 404,
            body: "Not Found".to_string(),
        }
    }
}

impl ResourceFetcher for MemoryFetcher {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fetch(&self, uri: &str) -> Result<Attributes, TransportError> {
        let mut state = self.state.lock();
        *state.fetches.entry(uri.to_string()).or_insert(0) += 1;
        state
            .resources
            .get(uri)
            .cloned()
            .ok_or_else(|| Self::not_found(uri))
    }

    fn delete(&self, uri: &str) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.resources.remove(uri).is_none() {
            return Err(Self::not_found(uri));
        }
        state.deleted.push(uri.to_string());
        Ok(())
    }

    /// New identifiers are `<endpoint>/<n>`; the stored attributes are the
    /// form fields (last occurrence wins) plus `id`.
    fn create(&self, endpoint: &str, payload: &[(String, String)]) -> Result<String, TransportError> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = format!("{}/{}", endpoint.trim_end_matches('/'), state.next_id);

        let mut attributes = Attributes::new();
        for (key, value) in payload {
            attributes.insert(key.clone(), Value::String(value.clone()));
        }
        attributes.insert("id".to_string(), Value::String(id.clone()));

        state.resources.insert(id.clone(), attributes);
        state.created.push(RecordedCall {
            uri: endpoint.to_string(),
            payload: payload.to_vec(),
        });
        Ok(id)
    }

    fn submit(&self, uri: &str, payload: &[(String, String)]) -> Result<String, TransportError> {
        let mut state = self.state.lock();
        state.submitted.push(RecordedCall {
            uri: uri.to_string(),
            payload: payload.to_vec(),
        });
        state
            .responses
            .get(uri)
            .cloned()
            .ok_or_else(|| Self::not_found(uri))
    }
}
