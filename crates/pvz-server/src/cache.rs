//! Entity Cache
//!
//! Bounded read-through cache of entities by id, backed by moka. Entries have
//! no TTL and are invalidated after a successful write. The store stays the
//! source of truth; a zero capacity turns the cache off entirely.
//!
//! Every invalidation bumps a write generation. A reader takes the generation
//! before it queries the store and hands it back to `insert`; a value read
//! before a concurrent write committed is then never left behind in the cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::future::Cache;
use uuid::Uuid;

use pvz::{Product, Pvz, Reception};

#[derive(Clone)]
pub struct EntityCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    name: &'static str,
    inner: Option<Cache<Uuid, V>>,
    generation: Arc<AtomicU64>,
}

impl<V> EntityCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, capacity: u64) -> Self {
        let inner = (capacity > 0).then(|| Cache::builder().max_capacity(capacity).build());
        Self {
            name,
            inner,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub async fn get(&self, id: &Uuid) -> Option<V> {
        let hit = self.inner.as_ref()?.get(id).await;
        if hit.is_some() {
            tracing::debug!("Cache hit for {} {}", self.name, id);
        }
        hit
    }

    /// Take before reading the store; pass to `insert`
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cache a value read at generation `seen`
    ///
    /// The entry is dropped again when a write invalidated the cache in the
    /// meantime, since the value may predate that write.
    pub async fn insert(&self, id: Uuid, value: V, seen: u64) {
        let Some(cache) = &self.inner else {
            return;
        };
        if self.generation() != seen {
            return;
        }
        cache.insert(id, value).await;
        if self.generation() != seen {
            tracing::debug!("Discarding {} {} read before a write", self.name, id);
            cache.invalidate(&id).await;
        }
    }

    pub async fn invalidate(&self, id: &Uuid) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(cache) = &self.inner {
            cache.invalidate(id).await;
        }
    }

    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }
}

/// The caches shared by the application services
#[derive(Clone)]
pub struct EntityCaches {
    pub pvz: EntityCache<Pvz>,
    pub receptions: EntityCache<Reception>,
    pub products: EntityCache<Product>,
}

impl EntityCaches {
    pub fn new(capacity: u64) -> Self {
        Self {
            pvz: EntityCache::new("pvz", capacity),
            receptions: EntityCache::new("reception", capacity),
            products: EntityCache::new("product", capacity),
        }
    }
}
