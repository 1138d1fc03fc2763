//! # Pokedex Core
//!
//! Client-side data layer for the species catalog: incremental page
//! loading, per-record detail fan-out, and a deduplicated append-only
//! collection exposed to any display layer.
//!
//! ## Architecture
//!
//! - `models` - Wire types (Reference, Page, Pokemon)
//! - `config` - Transport configuration with env overrides
//! - `transport` - Catalog reads (trait + reqwest implementation)
//! - `feed` - Page orchestration, accumulation state and the consumer contract
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pokedex_core::{config::TransportConfig, feed::Feed, transport::HttpTransport};
//!
//! let transport = HttpTransport::new(TransportConfig::from_env()?)?;
//! let feed = Feed::new(Arc::new(transport));
//! feed.activate().await;
//! ```

pub mod config;
pub mod feed;
pub mod models;
pub mod transport;

pub use feed::{Feed, FeedEvent, FeedSnapshot, PAGE_SIZE};
pub use models::{Page, Pokemon, Reference};
pub use transport::{CatalogTransport, FetchError, HttpTransport};
