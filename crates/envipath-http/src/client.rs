//! Blocking HTTP [`ResourceFetcher`].

use crate::config::ClientConfig;
use anyhow::Context;
use envipath_model::{Attributes, EnviPath, ResourceFetcher, TransportError};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, LOCATION};
use reqwest::redirect::Policy;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Talks to an enviPath instance over its JSON REST API.
///
/// Identifiers are absolute URLs; relative ones are resolved against the
/// configured host.
pub struct HttpFetcher {
    client: Client,
    /// Form posts answer with a redirect to the new resource, which must not
    /// be followed.
    form_client: Client,
    base: Url,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let base = config.base_url()?;
        let client = builder(config)
            .build()
            .context("failed to build HTTP client")?;
        let form_client = builder(config)
            .redirect(Policy::none())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            form_client,
            base_url: base.to_string(),
            base,
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    fn resolve(&self, uri: &str) -> Result<Url, TransportError> {
        resolve(&self.base, uri)
    }

    fn send(&self, uri: &str, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|err| TransportError::Network {
                uri: uri.to_string(),
                message: err.to_string(),
            })?;
        let status = response.status();
        tracing::debug!(uri, status = status.as_u16(), "enviPath response");
        if status.is_success() || status.is_redirection() {
            return Ok(response);
        }
        Err(TransportError::Status {
            uri: uri.to_string(),
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        })
    }
}

/// Opens an instance handle over HTTP.
pub fn connect(config: &ClientConfig) -> anyhow::Result<EnviPath> {
    let fetcher = HttpFetcher::new(config)?;
    tracing::info!(host = fetcher.base_url(), "connected to enviPath");
    Ok(EnviPath::new(Arc::new(fetcher)))
}

fn builder(config: &ClientConfig) -> reqwest::blocking::ClientBuilder {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
}

fn resolve(base: &Url, uri: &str) -> Result<Url, TransportError> {
    Url::parse(uri)
        .or_else(|_| base.join(uri))
        .map_err(|err| TransportError::InvalidResponse {
            uri: uri.to_string(),
            message: format!("not a resource URL: {err}"),
        })
}

fn invalid(uri: &str, message: impl Into<String>) -> TransportError {
    TransportError::InvalidResponse {
        uri: uri.to_string(),
        message: message.into(),
    }
}

/// Identifier of a freshly created resource: the redirect target, or the
/// `id` of a JSON body.
fn created_id(uri: &str, location: Option<&str>, body: &str) -> Result<String, TransportError> {
    if let Some(location) = location.filter(|l| !l.is_empty()) {
        return Ok(location.to_string());
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|_| invalid(uri, "create response has neither a Location header nor a JSON body"))?;
    value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid(uri, "create response carries no `id`"))
}

impl ResourceFetcher for HttpFetcher {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fetch(&self, uri: &str) -> Result<Attributes, TransportError> {
        tracing::debug!(uri, "GET");
        let url = self.resolve(uri)?;
        let response = self.send(uri, self.client.get(url))?;
        let body = response.text().map_err(|err| invalid(uri, err.to_string()))?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(invalid(uri, "expected a JSON object")),
            Err(err) => Err(invalid(uri, format!("malformed JSON: {err}"))),
        }
    }

    fn delete(&self, uri: &str) -> Result<(), TransportError> {
        tracing::debug!(uri, "DELETE");
        let url = self.resolve(uri)?;
        self.send(uri, self.client.delete(url))?;
        Ok(())
    }

    fn create(&self, endpoint: &str, payload: &[(String, String)]) -> Result<String, TransportError> {
        tracing::debug!(endpoint, fields = payload.len(), "POST create");
        let url = self.resolve(endpoint)?;
        let response = self.send(endpoint, self.form_client.post(url).form(payload))?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().unwrap_or_default();
        created_id(endpoint, location.as_deref(), &body)
    }

    fn submit(&self, uri: &str, payload: &[(String, String)]) -> Result<String, TransportError> {
        tracing::debug!(uri, fields = payload.len(), "POST submit");
        let url = self.resolve(uri)?;
        let response = self.send(uri, self.client.post(url).form(payload))?;
        response.text().map_err(|err| invalid(uri, err.to_string()))
    }
}
