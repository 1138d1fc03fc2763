//! In-memory transport for feed tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::models::{NamedResource, Page, Pokemon, PokemonId, Reference, TypeSlot};
use crate::transport::{CatalogTransport, FetchError};

pub fn record_url(id: PokemonId) -> String {
    format!("https://api.test/pokemon/{}/", id)
}

pub fn pokemon(id: PokemonId) -> Pokemon {
    Pokemon {
        id,
        name: format!("mon-{}", id),
        types: vec![TypeSlot {
            slot: 1,
            kind: NamedResource::named("normal"),
        }],
        stats: vec![],
        abilities: vec![],
        height: 10,
        weight: 100,
        sprites: Default::default(),
    }
}

/// Transport serving scripted pages keyed by offset
#[derive(Default)]
pub struct ScriptedTransport {
    pages: Mutex<HashMap<usize, Page>>,
    failing_pages: Mutex<HashSet<usize>>,
    failing_records: Mutex<HashSet<PokemonId>>,
    page_calls: Mutex<Vec<(usize, usize)>>,
    record_calls: Mutex<usize>,
    reverse_latency: bool,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `ids` at `offset`, with a next locator when `has_next`
    pub fn with_page(self, offset: usize, ids: RangeInclusive<PokemonId>, has_next: bool) -> Self {
        self.with_page_ids(offset, ids.collect(), has_next)
    }

    pub fn with_page_ids(self, offset: usize, ids: Vec<PokemonId>, has_next: bool) -> Self {
        let page = Page {
            count: 1000,
            next: has_next.then(|| format!("https://api.test/pokemon?offset={}", offset + 40)),
            results: ids
                .iter()
                .map(|id| Reference::new(format!("mon-{}", id), record_url(*id)))
                .collect(),
        };
        self.pages.lock().unwrap().insert(offset, page);
        self
    }

    pub fn failing_record(self, id: PokemonId) -> Self {
        self.failing_records.lock().unwrap().insert(id);
        self
    }

    pub fn failing_page(self, offset: usize) -> Self {
        self.failing_pages.lock().unwrap().insert(offset);
        self
    }

    /// Lower ids take longer to resolve
    pub fn with_reverse_latency(mut self) -> Self {
        self.reverse_latency = true;
        self
    }

    /// Listing requests wait for a permit from `gate`
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn heal_page(&self, offset: usize) {
        self.failing_pages.lock().unwrap().remove(&offset);
    }

    pub fn heal_record(&self, id: PokemonId) {
        self.failing_records.lock().unwrap().remove(&id);
    }

    pub fn page_calls(&self) -> Vec<(usize, usize)> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn record_calls(&self) -> usize {
        *self.record_calls.lock().unwrap()
    }
}

#[async_trait]
impl CatalogTransport for ScriptedTransport {
    async fn fetch_page(&self, offset: usize, page_size: usize) -> Result<Page, FetchError> {
        self.page_calls.lock().unwrap().push((offset, page_size));

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| FetchError::new("gate", e))?;
            permit.forget();
        }

        let url = format!("https://api.test/pokemon?offset={}", offset);
        if self.failing_pages.lock().unwrap().contains(&offset) {
            return Err(FetchError::new(url, "status 500"));
        }
        self.pages
            .lock()
            .unwrap()
            .get(&offset)
            .cloned()
            .ok_or_else(|| FetchError::new(url, "status 404"))
    }

    async fn fetch_record(&self, locator: &str) -> Result<Pokemon, FetchError> {
        *self.record_calls.lock().unwrap() += 1;

        let id: PokemonId = locator
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| FetchError::new(locator, "bad locator"))?;

        if self.reverse_latency {
            tokio::time::sleep(Duration::from_millis(u64::from(50u32.saturating_sub(id)) * 2)).await;
        }

        if self.failing_records.lock().unwrap().contains(&id) {
            return Err(FetchError::new(locator, "status 500"));
        }
        Ok(pokemon(id))
    }
}
