//! # Accumulation State
//!
//! The accumulated collection, cursor and flags of one feed, with every
//! mutation expressed as an explicit transition.

use serde::Serialize;
use std::collections::HashSet;

use super::PAGE_SIZE;
use crate::models::{Pokemon, PokemonId};

/// Message surfaced to the consumer when a page load fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load pokémon.";

/// Pagination cursor, advanced only by a committed page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CursorState {
    /// Offset of the last successfully committed page
    pub last_offset: usize,
    /// Next-page locator of that page; `None` before the first commit and
    /// once the catalog is exhausted
    pub next: Option<String>,
    /// Whether any page has been committed yet
    pub committed: bool,
}

impl CursorState {
    /// Whether another page can be requested
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Offset the next trigger should load
    pub fn next_offset(&self) -> usize {
        self.last_offset + PAGE_SIZE
    }
}

/// Outcome of merging one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    /// Records appended to the collection
    pub appended: usize,
    /// Records dropped because their id was already present
    pub duplicates: usize,
    /// Collection length after the merge
    pub total: usize,
}

/// All mutable state of a feed
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    collection: Vec<Pokemon>,
    seen: HashSet<PokemonId>,
    cursor: CursorState,
    loading: bool,
    error: Option<String>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &[Pokemon] {
        &self.collection
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    /// Look up a loaded record by id
    pub fn get(&self, id: PokemonId) -> Option<&Pokemon> {
        if !self.seen.contains(&id) {
            return None;
        }
        self.collection.iter().find(|p| p.id == id)
    }

    /// Idle → Loading: set loading, clear error
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Loading → Idle: merge a fully resolved page and advance the cursor
    ///
    /// Records whose id is already present, including repeats within
    /// `records` itself, are dropped; survivors keep their listing order.
    pub fn commit(
        &mut self,
        offset: usize,
        next: Option<String>,
        records: Vec<Pokemon>,
    ) -> CommitSummary {
        let incoming = records.len();
        let before = self.collection.len();
        for record in records {
            if self.seen.insert(record.id) {
                self.collection.push(record);
            }
        }
        let appended = self.collection.len() - before;

        self.cursor = CursorState {
            last_offset: offset,
            next,
            committed: true,
        };
        self.loading = false;

        CommitSummary {
            appended,
            duplicates: incoming - appended,
            total: self.collection.len(),
        }
    }

    /// Loading → Idle/Error: record the failure, leave collection and cursor untouched
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Read-only copy for consumers
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            collection: self.collection.clone(),
            loading: self.loading,
            error: self.error.clone(),
            has_more: self.has_more(),
        }
    }
}

/// Read-only view handed to the display layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub collection: Vec<Pokemon>,
    pub loading: bool,
    pub error: Option<String>,
    pub has_more: bool,
}
