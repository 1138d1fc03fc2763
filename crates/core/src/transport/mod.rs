//! # Catalog Transport
//!
//! The two network reads the feed depends on: a paged listing and a
//! per-reference detail lookup.
//!
//! ## Modules
//!
//! - `http` - reqwest-backed implementation against the public catalog

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Page, Pokemon};

pub use http::HttpTransport;

/// Any failed catalog read: network, non-success status or undecodable body
///
/// Callers treat every failure alike; `reason` is diagnostic only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("fetch failed for {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Remote catalog reads
///
/// One attempt per call, no caching.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Fetch one listing page
    async fn fetch_page(&self, offset: usize, page_size: usize) -> Result<Page, FetchError>;

    /// Dereference a locator into a full record
    async fn fetch_record(&self, locator: &str) -> Result<Pokemon, FetchError>;
}
