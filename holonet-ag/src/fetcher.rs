//! Full-collection fetcher
//!
//! Two-phase fan-out: the first page tells us how many pages exist, then all
//! page requests go out concurrently and are joined before anything lands in
//! the bucket.

use crate::cache::Bucket;
use crate::client::PageSource;
use futures::future::join_all;
use holonet_common::{derive_id, Error, Item, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches every page of a collection into a bucket
pub struct CollectionFetcher {
    source: Arc<dyn PageSource>,
    /// Merge the discovery page instead of requesting `?page=1` again
    reuse_first_page: bool,
}

impl CollectionFetcher {
    pub fn new(source: Arc<dyn PageSource>, reuse_first_page: bool) -> Self {
        Self {
            source,
            reuse_first_page,
        }
    }

    /// Populate `bucket` with the whole collection under `root_url`
    ///
    /// No-op when `bucket` already holds items. The bucket is only touched
    /// once every page request has succeeded, so a failed or dropped call
    /// leaves it exactly as it was.
    pub async fn fetch_all(&self, root_url: &str, bucket: &mut Bucket) -> Result<()> {
        if !bucket.is_empty() {
            return Ok(());
        }

        let first = self.source.fetch_page(root_url).await?;
        let page_size = first.results.len() as u64;
        let pages = total_pages(first.count, page_size);

        debug!(
            root_url = %root_url,
            count = first.count,
            page_size,
            pages,
            "Discovered collection size"
        );

        let (mut fetched, first_to_request) = if self.reuse_first_page && pages > 0 {
            (vec![(1, Ok(first))], 2)
        } else {
            (Vec::new(), 1)
        };

        let requests = (first_to_request..=pages).map(|page| {
            let source = Arc::clone(&self.source);
            let url = page_url(root_url, page);
            async move { (page, source.fetch_page(&url).await) }
        });
        fetched.extend(join_all(requests).await);

        let mut collected = Bucket::new();
        let mut first_error = None;
        for (page, result) in fetched {
            match result {
                Ok(payload) => {
                    for item in payload.results {
                        let item = assign_id(root_url, item)?;
                        collected.insert(item.id, item);
                    }
                }
                Err(e) => {
                    warn!(root_url = %root_url, page, error = %e, "Page fetch failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        bucket.extend(collected);
        Ok(())
    }
}

/// `ceil(count / page_size)`; an empty first page means zero pages
pub fn total_pages(count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

pub fn page_url(root_url: &str, page: u64) -> String {
    format!("{}?page={}", root_url, page)
}

fn assign_id(root_url: &str, mut item: Item) -> Result<Item> {
    item.id = derive_id(root_url, &item.url).ok_or_else(|| {
        Error::UnexpectedShape(format!("cannot derive id from item url {:?}", item.url))
    })?;
    Ok(item)
}
