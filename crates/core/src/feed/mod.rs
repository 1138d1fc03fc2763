//! # Feed
//!
//! Infinite, deduplicated, append-only list of catalog records.
//!
//! ## Modules
//!
//! - `state` - Accumulated collection, cursor and flags as explicit transitions
//! - `loader` - Listing + concurrent detail fan-out for one page
//! - `events` - Lifecycle events for display layers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pokedex_core::feed::Feed;
//! use pokedex_core::transport::HttpTransport;
//!
//! let feed = Feed::new(Arc::new(HttpTransport::new(config)?));
//! feed.activate().await;
//! // ...user scrolled near the end
//! feed.request_next_page().await;
//! let view = feed.snapshot().await;
//! ```

pub mod events;
pub mod loader;
pub mod state;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::models::{Pokemon, PokemonId};
use crate::transport::{CatalogTransport, FetchError};

pub use events::{FeedEvent, FeedEventKind};
pub use loader::{LoadedPage, PageLoader};
pub use state::{CommitSummary, CursorState, FeedSnapshot, FeedState, LOAD_FAILED_MESSAGE};

/// Number of references requested per listing page
pub const PAGE_SIZE: usize = 40;

/// The consumer-facing feed
///
/// Owns its state for its whole lifetime; dropping the feed discards the
/// collection. At most one page load is in flight at a time: triggers that
/// arrive while `loading` is set are ignored.
pub struct Feed {
    loader: PageLoader,
    state: RwLock<FeedState>,
    activated: AtomicBool,
    event_tx: Option<mpsc::Sender<FeedEvent>>,
    event_seq: AtomicU64,
}

impl Feed {
    /// Create an idle, empty feed over a transport
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self {
            loader: PageLoader::new(transport, PAGE_SIZE),
            state: RwLock::new(FeedState::new()),
            activated: AtomicBool::new(false),
            event_tx: None,
            event_seq: AtomicU64::new(0),
        }
    }

    /// Set event channel for streaming events
    pub fn with_event_channel(mut self, tx: mpsc::Sender<FeedEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Emit an event
    async fn emit(&self, kind: FeedEventKind, offset: usize, data: Option<serde_json::Value>) {
        if let Some(tx) = &self.event_tx {
            let seq = self.event_seq.fetch_add(1, Ordering::SeqCst) + 1;
            let mut event = FeedEvent::new(seq, kind, offset);
            event.data = data;
            let _ = tx.send(event).await;
        }
    }

    /// First activation: load offset 0. Later calls do nothing.
    ///
    /// Returns whether this call performed the initial load.
    pub async fn activate(&self) -> bool {
        if self.activated.swap(true, Ordering::SeqCst) {
            return false;
        }
        let _ = self.load_page(0).await;
        true
    }

    /// Load the page at `offset` and merge it
    ///
    /// Does not check gating; use [`Feed::request_next_page`] from display
    /// code. On failure the collection and cursor are left untouched and
    /// the snapshot carries the error message.
    pub async fn load_page(&self, offset: usize) -> Result<CommitSummary, FetchError> {
        self.state.write().await.begin();
        self.run_load(offset).await
    }

    /// Trigger the next page if there is one and nothing is loading
    ///
    /// Returns whether a load was issued.
    pub async fn request_next_page(&self) -> bool {
        let offset = {
            let mut state = self.state.write().await;
            if !state.has_more() || state.is_loading() {
                return false;
            }
            state.begin();
            state.cursor().next_offset()
        };

        let _ = self.run_load(offset).await;
        true
    }

    /// Re-attempt after a failure, resuming from the last committed offset
    ///
    /// Reloads offset 0 if no page has ever been committed; otherwise
    /// behaves like [`Feed::request_next_page`]. No-op without an error.
    pub async fn retry(&self) -> bool {
        let offset = {
            let mut state = self.state.write().await;
            if state.error().is_none() || state.is_loading() {
                return false;
            }
            let offset = if !state.cursor().committed {
                0
            } else if state.has_more() {
                state.cursor().next_offset()
            } else {
                return false;
            };
            state.begin();
            offset
        };

        let _ = self.run_load(offset).await;
        true
    }

    /// Fetch and commit; `loading` must already be set
    #[tracing::instrument(skip(self))]
    async fn run_load(&self, offset: usize) -> Result<CommitSummary, FetchError> {
        self.emit(FeedEventKind::PageRequested, offset, None).await;

        match self.loader.fetch(offset).await {
            Ok(page) => {
                let (summary, has_more) = {
                    let mut state = self.state.write().await;
                    let summary = state.commit(page.offset, page.next, page.records);
                    (summary, state.has_more())
                };

                tracing::info!(
                    appended = summary.appended,
                    duplicates = summary.duplicates,
                    total = summary.total,
                    has_more,
                    "Page committed"
                );

                self.emit(
                    FeedEventKind::PageLoaded,
                    offset,
                    Some(serde_json::json!({
                        "appended": summary.appended,
                        "total": summary.total
                    })),
                )
                .await;
                if !has_more {
                    self.emit(FeedEventKind::Exhausted, offset, None).await;
                }

                Ok(summary)
            }
            Err(e) => {
                tracing::warn!("Page load failed: {}", e);
                self.state.write().await.fail(LOAD_FAILED_MESSAGE);

                self.emit(
                    FeedEventKind::PageFailed,
                    offset,
                    Some(serde_json::json!({ "message": LOAD_FAILED_MESSAGE })),
                )
                .await;

                Err(e)
            }
        }
    }

    /// Read-only copy of the current state
    pub async fn snapshot(&self) -> FeedSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading()
    }

    pub async fn has_more(&self) -> bool {
        self.state.read().await.has_more()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.collection().len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Current cursor
    pub async fn cursor(&self) -> CursorState {
        self.state.read().await.cursor().clone()
    }

    /// A loaded record by id
    pub async fn get(&self, id: PokemonId) -> Option<Pokemon> {
        self.state.read().await.get(id).cloned()
    }
}

impl std::fmt::Debug for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed")
            .field("loader", &self.loader)
            .field("activated", &self.activated.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
