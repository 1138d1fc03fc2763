//! # Page Loader
//!
//! One listing request followed by a concurrent detail fetch per reference.
//! The join is fail-fast: a single failed detail fails the whole page, and
//! nothing from a failed page is ever handed back.

use futures::future::try_join_all;
use std::sync::Arc;

use crate::models::Pokemon;
use crate::transport::{CatalogTransport, FetchError};

/// A listing page with every reference resolved, in listing order
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub offset: usize,
    pub next: Option<String>,
    pub records: Vec<Pokemon>,
}

/// Fetches fully-resolved pages from a transport
#[derive(Clone)]
pub struct PageLoader {
    transport: Arc<dyn CatalogTransport>,
    page_size: usize,
}

impl PageLoader {
    pub fn new(transport: Arc<dyn CatalogTransport>, page_size: usize) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch the page at `offset` and all of its records
    pub async fn fetch(&self, offset: usize) -> Result<LoadedPage, FetchError> {
        let page = self.transport.fetch_page(offset, self.page_size).await?;

        tracing::debug!(
            offset,
            references = page.results.len(),
            total = page.count,
            "Listing received, resolving details"
        );

        // SCATTER/GATHER: output order follows input order, not completion order
        let records = try_join_all(
            page.results
                .iter()
                .map(|reference| self.transport.fetch_record(&reference.url)),
        )
        .await?;

        Ok(LoadedPage {
            offset,
            next: page.next,
            records,
        })
    }
}

impl std::fmt::Debug for PageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLoader")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::mock::ScriptedTransport;
    use crate::feed::PAGE_SIZE;

    #[tokio::test]
    async fn test_fetch_resolves_full_page() {
        let transport = Arc::new(ScriptedTransport::new().with_page(0, 1..=40, true));
        let loader = PageLoader::new(transport.clone(), PAGE_SIZE);

        let page = loader.fetch(0).await.unwrap();

        assert_eq!(page.records.len(), 40);
        assert!(page.next.is_some());
        assert_eq!(transport.page_calls(), vec![(0, PAGE_SIZE)]);
        assert_eq!(transport.record_calls(), 40);
    }

    #[tokio::test]
    async fn test_records_follow_listing_order_not_completion_order() {
        // Earlier references complete last
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_page(0, 1..=8, false)
                .with_reverse_latency(),
        );
        let loader = PageLoader::new(transport, PAGE_SIZE);

        let page = loader.fetch(0).await.unwrap();
        let ids: Vec<u32> = page.records.iter().map(|p| p.id).collect();

        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_one_failed_detail_fails_page() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_page(0, 1..=40, true)
                .failing_record(17),
        );
        let loader = PageLoader::new(transport, PAGE_SIZE);

        let err = loader.fetch(0).await.unwrap_err();
        assert!(err.url.ends_with("/17/"));
    }

    #[tokio::test]
    async fn test_listing_failure_skips_details() {
        let transport = Arc::new(ScriptedTransport::new());
        let loader = PageLoader::new(transport.clone(), PAGE_SIZE);

        tokio_test::assert_err!(loader.fetch(0).await);
        assert_eq!(transport.record_calls(), 0);
    }
}
