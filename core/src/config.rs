//! Client configuration.
//!
//! Configuration can be built in code, deserialized (every field has a
//! default), or read from `CLOUD_SDK_*` environment variables.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.cloud.example.com/v1";

const ENV_BASE_URL: &str = "CLOUD_SDK_BASE_URL";
const ENV_USER_AGENT: &str = "CLOUD_SDK_USER_AGENT";
const ENV_TIMEOUT: &str = "CLOUD_SDK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout handed to transports that support one.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("cloud-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load from the process environment, falling back to defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = agent;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            config.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_TIMEOUT} must be whole seconds, got {raw:?}")))?;
        }
        Ok(config)
    }
}
