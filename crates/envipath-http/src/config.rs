//! Client configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HOST: &str = "https://envipath.org/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Instance root, e.g. `https://envipath.org/`. Top-level factories
    /// append endpoint names to it.
    pub host: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Accept self-signed certificates of local instances
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout_secs: 30,
            user_agent: format!("envipath-rs/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `ENVIPATH_HOST`, `ENVIPATH_TIMEOUT_SECS` and
    /// `ENVIPATH_USER_AGENT` where set.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("ENVIPATH_HOST") {
            config.host = host;
        }
        if let Ok(timeout) = std::env::var("ENVIPATH_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("ENVIPATH_TIMEOUT_SECS is not a number: {timeout:?}"))?;
        }
        if let Ok(agent) = std::env::var("ENVIPATH_USER_AGENT") {
            config.user_agent = agent;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file. Missing keys take their default.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Host parsed as an absolute URL with a trailing slash.
    pub fn base_url(&self) -> anyhow::Result<url::Url> {
        let mut host = self.host.trim().to_string();
        if !host.ends_with('/') {
            host.push('/');
        }
        let url = url::Url::parse(&host).with_context(|| format!("invalid host {:?}", self.host))?;
        if url.cannot_be_a_base() {
            anyhow::bail!("host {:?} cannot be used as a base URL", self.host);
        }
        Ok(url)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.base_url()?;
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be positive");
        }
        Ok(())
    }
}
