//! LRU cache for materialized resource handles.
//!
//! Keyed by raw source URL, bounded by a configured entry capacity.
//! Eviction is strict LRU with ties broken by insertion order, and every
//! evicted handle is released through the owning [`ImageSource`] exactly
//! once, before the removal becomes observable to other callers.
//!
//! Note the key space: this cache is keyed by candidate source URL, not by
//! the resolver's entity cache key. The two dimensions are deliberately
//! distinct; conflating them would let eviction corrupt the permanent
//! resolved map.

use std::sync::Arc;

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::debug;

use crate::source::{ImageSource, ResourceHandle};

/// Default number of resource handles to keep alive.
pub const DEFAULT_RESOURCE_CACHE_CAPACITY: usize = 64;

/// Bounded map from source URL to materialized resource handle.
///
/// # Thread Safety
///
/// The cache is thread-safe and shared across async tasks via the resolver.
pub struct ResourceLru<S> {
    /// Source that materialized the handles; evictions release through it
    source: Arc<S>,

    /// The underlying LRU, kept unbounded so eviction stays in our hands
    /// and each evicted handle can be released before removal is visible
    cache: RwLock<LruCache<String, ResourceHandle>>,

    /// Maximum number of live entries
    capacity: usize,
}

impl<S: ImageSource> ResourceLru<S> {
    /// Create a cache with the default capacity.
    pub fn new(source: Arc<S>) -> Self {
        Self::with_capacity(source, DEFAULT_RESOURCE_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` handles.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Capacity is validated at configuration
    /// time; see `Config::validate`.
    pub fn with_capacity(source: Arc<S>, capacity: usize) -> Self {
        assert!(capacity > 0, "resource cache capacity must be positive");
        Self {
            source,
            cache: RwLock::new(LruCache::unbounded()),
            capacity,
        }
    }

    /// Get the handle for a source URL, promoting it to most-recently-used.
    pub async fn get(&self, source_url: &str) -> Option<ResourceHandle> {
        let mut cache = self.cache.write().await;
        cache.get(source_url).cloned()
    }

    /// Check for an entry without touching recency order.
    pub async fn contains(&self, source_url: &str) -> bool {
        let cache = self.cache.read().await;
        cache.contains(source_url)
    }

    /// Insert a handle at the most-recently-used position.
    ///
    /// If the same source URL was already present, its old handle is
    /// released first. If the cache then exceeds capacity, least-recently
    /// used entries are evicted one at a time, releasing each handle, until
    /// the size is back within bounds.
    pub async fn insert(&self, source_url: impl Into<String>, handle: ResourceHandle) {
        let source_url = source_url.into();
        let mut cache = self.cache.write().await;

        if let Some(old) = cache.put(source_url, handle) {
            self.source.release(&old);
        }

        while cache.len() > self.capacity {
            match cache.pop_lru() {
                Some((evicted_url, evicted)) => {
                    debug!(url = %evicted_url, handle = evicted.url(), "evicting resource");
                    self.source.release(&evicted);
                }
                None => break,
            }
        }
    }

    /// Remove every entry, releasing each handle.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        while let Some((_, handle)) = cache.pop_lru() {
            self.source.release(&handle);
        }
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        let cache = self.cache.read().await;
        cache.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// Tests
// =============================================================================
