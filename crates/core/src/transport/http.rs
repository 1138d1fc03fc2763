//! # HTTP Transport
//!
//! `CatalogTransport` over the public REST catalog.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{CatalogTransport, FetchError};
use crate::config::TransportConfig;
use crate::models::{Page, Pokemon};

/// reqwest-backed catalog client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Build a client from configuration
    pub fn new(config: TransportConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        tracing::info!(base_url = %config.base_url, resource = %config.resource, "Catalog transport ready");

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// GET a URL and decode its JSON body; non-2xx is a failure
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, format!("status {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::new(url, e))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::new(url, format!("decode: {}", e)))
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn fetch_page(&self, offset: usize, page_size: usize) -> Result<Page, FetchError> {
        let url = self.config.page_url(offset, page_size);
        self.get_json(&url).await
    }

    async fn fetch_record(&self, locator: &str) -> Result<Pokemon, FetchError> {
        self.get_json(locator).await
    }
}
