//! # Transport Configuration
//!
//! Where the catalog lives and how the HTTP client talks to it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default catalog root
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Default listing resource under the base URL
pub const DEFAULT_RESOURCE: &str = "pokemon";

/// Configuration for the HTTP catalog transport
///
/// ## Example
/// ```rust,ignore
/// use pokedex_core::config::TransportConfig;
///
/// // Public catalog
/// let config = TransportConfig::default();
///
/// // Local mirror
/// let config = TransportConfig::default().with_base_url("http://localhost:8000/api/v2");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    /// Catalog root, without trailing slash
    pub base_url: String,
    /// Listing resource (e.g. "pokemon")
    #[serde(default = "default_resource")]
    pub resource: String,
    /// Client-side request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_resource() -> String {
    DEFAULT_RESOURCE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("pokedex-feed/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource: default_resource(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl TransportConfig {
    /// Set the catalog root
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the listing resource
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into().trim_matches('/').to_string();
        self
    }

    /// Defaults overridden by `POKEDEX_API_URL`, `POKEDEX_RESOURCE`
    /// and `POKEDEX_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("POKEDEX_API_URL") {
            config = config.with_base_url(url);
        }
        if let Some(resource) = lookup("POKEDEX_RESOURCE") {
            config = config.with_resource(resource);
        }
        if let Some(timeout) = lookup("POKEDEX_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid POKEDEX_TIMEOUT_SECS: {:?}", timeout))?;
        }

        Ok(config)
    }

    /// Listing URL for one page
    pub fn page_url(&self, offset: usize, page_size: usize) -> String {
        format!(
            "{}/{}?limit={}&offset={}",
            self.base_url, self.resource, page_size, offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.resource, "pokemon");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("pokedex-feed/"));
    }

    #[test]
    fn test_page_url() {
        let config = TransportConfig::default().with_base_url("http://localhost:9000/api/v2/");
        assert_eq!(
            config.page_url(80, 40),
            "http://localhost:9000/api/v2/pokemon?limit=40&offset=80"
        );
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("POKEDEX_API_URL", "http://mirror.local/v2"),
            ("POKEDEX_RESOURCE", "/pokemon-species/"),
            ("POKEDEX_TIMEOUT_SECS", " 5 "),
        ]);
        let config = TransportConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.base_url, "http://mirror.local/v2");
        assert_eq!(config.resource, "pokemon-species");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let result = TransportConfig::from_lookup(|k| {
            (k == "POKEDEX_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: TransportConfig =
            serde_json::from_str(r#"{"base_url": "http://x"}"#).unwrap();
        assert_eq!(config.resource, "pokemon");
        assert_eq!(config.timeout_secs, 30);
    }
}
