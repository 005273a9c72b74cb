//! Resource cache
//!
//! One bucket per resource kind, populated lazily and kept for the life of
//! the process. Callers only ever receive [`Snapshot`]s.

use crate::fetcher::CollectionFetcher;
use holonet_common::{Item, ResourceKind, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// Id → item mapping for one resource kind
pub type Bucket = BTreeMap<u64, Item>;

/// Read-only view of a bucket
///
/// Shares the bucket's storage; there is no way to reach a mutable reference
/// through it. Use [`Snapshot::to_vec`] for an owned, freely mutable copy.
#[derive(Debug, Clone)]
pub struct Snapshot {
    kind: ResourceKind,
    items: Arc<Bucket>,
}

impl Snapshot {
    /// Snapshot over items outside any cache, keyed by their assigned ids
    pub fn from_items<I>(kind: ResourceKind, items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        Self {
            kind,
            items: Arc::new(items.into_iter().map(|item| (item.id, item)).collect()),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item by id; `None` when the id is not cached
    pub fn get(&self, id: u64) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn to_vec(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Item;
    type IntoIter = std::collections::btree_map::Values<'a, u64, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

struct BucketSlot {
    kind: ResourceKind,
    items: RwLock<Arc<Bucket>>,
    /// Held for the whole population run
    populating: Mutex<()>,
}

impl BucketSlot {
    fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            items: RwLock::new(Arc::new(Bucket::new())),
            populating: Mutex::new(()),
        }
    }

    async fn snapshot(&self) -> Snapshot {
        Snapshot {
            kind: self.kind,
            items: Arc::clone(&*self.items.read().await),
        }
    }
}

/// Process-lifetime cache of remote collections
pub struct ResourceCache {
    base_url: String,
    fetcher: CollectionFetcher,
    planets: BucketSlot,
    people: BucketSlot,
}

impl ResourceCache {
    pub fn new(base_url: impl Into<String>, fetcher: CollectionFetcher) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
            planets: BucketSlot::new(ResourceKind::Planets),
            people: BucketSlot::new(ResourceKind::People),
        }
    }

    fn slot(&self, kind: ResourceKind) -> &BucketSlot {
        match kind {
            ResourceKind::Planets => &self.planets,
            ResourceKind::People => &self.people,
        }
    }

    /// Snapshot of `kind`, fetching the collection first if its bucket is empty
    ///
    /// Concurrent first accesses to the same kind wait for a single
    /// population run. Different kinds populate independently.
    pub async fn get_or_populate(&self, kind: ResourceKind) -> Result<Snapshot> {
        let start = Instant::now();
        let slot = self.slot(kind);

        let current = slot.snapshot().await;
        if !current.is_empty() {
            info!(
                resource = %kind,
                count = current.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Pulling from existing cache"
            );
            return Ok(current);
        }

        let _guard = slot.populating.lock().await;

        // Another request may have finished populating while we waited
        let current = slot.snapshot().await;
        if !current.is_empty() {
            return Ok(current);
        }

        let mut fresh = Bucket::new();
        self.fetcher
            .fetch_all(&kind.root_url(&self.base_url), &mut fresh)
            .await?;

        let items = Arc::new(fresh);
        *slot.items.write().await = Arc::clone(&items);

        info!(
            resource = %kind,
            count = items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Populated cache"
        );

        Ok(Snapshot { kind, items })
    }

    /// Planets and people, populated concurrently
    pub async fn get_planets_and_people(&self) -> Result<(Snapshot, Snapshot)> {
        tokio::try_join!(
            self.get_or_populate(ResourceKind::Planets),
            self.get_or_populate(ResourceKind::People),
        )
    }

    /// Current snapshot without triggering population; `None` while empty
    pub async fn peek(&self, kind: ResourceKind) -> Option<Snapshot> {
        let current = self.slot(kind).snapshot().await;
        (!current.is_empty()).then_some(current)
    }
}
