//! # Feed Events
//!
//! Lifecycle notifications a display layer can subscribe to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of feed event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedEventKind {
    /// A page load started
    PageRequested,
    /// A page was merged into the collection
    PageLoaded,
    /// A page load failed; nothing was merged
    PageFailed,
    /// The catalog has no further pages
    Exhausted,
}

/// An event emitted by a feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Per-feed sequence number, starting at 1
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: FeedEventKind,
    /// Offset of the page concerned
    pub offset: usize,
    /// Associated data (JSON)
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl FeedEvent {
    /// Create a new event
    pub fn new(seq: u64, kind: FeedEventKind, offset: usize) -> Self {
        Self {
            seq,
            timestamp: Utc::now(),
            kind,
            offset,
            data: None,
        }
    }

    /// Add data to the event
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = FeedEvent::new(3, FeedEventKind::PageLoaded, 40)
            .with_data(serde_json::json!({ "appended": 40 }));

        assert_eq!(event.seq, 3);
        assert_eq!(event.offset, 40);
        assert_eq!(event.data.unwrap()["appended"], 40);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&FeedEventKind::PageFailed).unwrap();
        assert_eq!(json, "\"page_failed\"");
    }
}
