//! The image resolver.
//!
//! For each entity the resolver derives an ordered candidate list, tries
//! the candidates strictly in order against the resource cache and the
//! image source, and memoizes the outcome permanently for the session.
//! Concurrent callers sharing a cache key are deduplicated: exactly one
//! underlying attempt sequence runs, and every caller receives its value.
//!
//! Absence of an image is a value, not an error: `resolve_image` returns
//! `None` once every candidate has failed, and that `None` is cached just
//! as permanently as a hit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{Mutex, Notify, RwLock};
use tracing::{debug, trace};

use crate::cache::{ResourceLru, DEFAULT_RESOURCE_CACHE_CAPACITY};
use crate::candidate::{self, CandidateConfig, OverrideFn};
use crate::entity::Entity;
use crate::error::FetchError;
use crate::source::ImageSource;

// =============================================================================
// Configuration
// =============================================================================

/// Default per-candidate timeout in milliseconds.
///
/// Bounds how long a single slow candidate can stall a resolution. A
/// timeout counts as a transient failure for that candidate only.
pub const DEFAULT_CANDIDATE_TIMEOUT_MS: u64 = 8_000;

/// Default number of concurrent prewarm workers.
pub const DEFAULT_PREWARM_WORKERS: usize = 4;

/// How candidates are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Fetch the candidate's binary payload, materialize a local handle,
    /// and keep it in the bounded resource cache. The resolved value is
    /// the handle's local URL.
    CachedBinary,

    /// Only check that the candidate loads as a displayable image; no
    /// binary data is retained. The resolved value is the candidate URL.
    ProbeOnly,
}

/// Settings for an [`ImageResolver`], read once at construction.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Candidate attempt strategy
    pub strategy: ResolveStrategy,

    /// Candidate generation settings
    pub candidates: CandidateConfig,

    /// Capacity of the bounded resource handle cache
    pub resource_capacity: usize,

    /// Per-candidate timeout; `None` disables the bound
    pub candidate_timeout: Option<Duration>,

    /// Concurrency limit for [`prewarm`](ImageResolver::prewarm)
    pub prewarm_workers: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: ResolveStrategy::CachedBinary,
            candidates: CandidateConfig::default(),
            resource_capacity: DEFAULT_RESOURCE_CACHE_CAPACITY,
            candidate_timeout: Some(Duration::from_millis(DEFAULT_CANDIDATE_TIMEOUT_MS)),
            prewarm_workers: DEFAULT_PREWARM_WORKERS,
        }
    }
}

// =============================================================================
// In-flight state
// =============================================================================

/// Shared state for one in-flight resolution.
struct InFlightState {
    /// Notification for waiters
    notify: Notify,
    /// Final answer, set exactly once when the attempt completes
    result: Mutex<Option<Option<Arc<str>>>>,
}

impl InFlightState {
    fn new() -> Self {
        Self {
            notify: Notify::new(),
            result: Mutex::new(None),
        }
    }

    /// Wait until the leader publishes the answer.
    ///
    /// The notified future is enabled before the result check so a
    /// notification between the check and the await is never lost.
    async fn wait(&self) -> Option<Arc<str>> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(answer) = self.result.lock().await.as_ref() {
                return answer.clone();
            }
            notified.await;
        }
    }
}

// =============================================================================
// ImageResolver
// =============================================================================

/// Memoized, deduplicating image resolution service.
///
/// All state (the permanent resolved map, the in-flight registry, and the
/// bounded resource cache) lives behind an `Arc`, so the resolver is cheap
/// to clone and share across tasks. Construct one per session; tests get
/// isolated instances instead of a shared singleton.
pub struct ImageResolver<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for ImageResolver<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<S> {
    /// Platform seam for fetch/probe/materialize/release
    source: Arc<S>,

    /// Bounded handle cache, keyed by raw candidate URL
    resources: ResourceLru<S>,

    /// Permanent session answers, keyed by entity cache key.
    /// `None` means "fully attempted, nothing found".
    resolved: RwLock<HashMap<String, Option<Arc<str>>>>,

    /// At most one entry per cache key while a resolution is running
    in_flight: Mutex<HashMap<String, Arc<InFlightState>>>,

    config: ResolverConfig,
}

impl<S: ImageSource + 'static> ImageResolver<S> {
    /// Create a resolver with default settings.
    pub fn new(source: Arc<S>) -> Self {
        Self::with_config(source, ResolverConfig::default())
    }

    /// Create a resolver with explicit settings.
    pub fn with_config(source: Arc<S>, config: ResolverConfig) -> Self {
        let resources = ResourceLru::with_capacity(source.clone(), config.resource_capacity);
        Self {
            inner: Arc::new(Inner {
                source,
                resources,
                resolved: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                config,
            }),
        }
    }

    /// Resolve one winning image reference for an entity.
    ///
    /// Returns the resolved URL (a local handle URL under the cached-binary
    /// strategy, the candidate URL under probe-only), or `None` when every
    /// candidate failed. Never returns an error; per-candidate failures are
    /// absorbed and logged at debug level.
    ///
    /// The first call for a given cache key runs the attempt sequence;
    /// concurrent callers share it, and later callers get the memoized
    /// answer with no further network access.
    pub async fn resolve_image(
        &self,
        entity: &Entity,
        override_fn: Option<&OverrideFn>,
    ) -> Option<Arc<str>> {
        let key = candidate::cache_key(entity);

        // Fast path: permanent session cache. Candidates are not derived
        // for a memoized answer.
        {
            let resolved = self.inner.resolved.read().await;
            if let Some(answer) = resolved.get(&key) {
                trace!(key = %key, "resolved cache hit");
                return answer.clone();
            }
        }

        let state = {
            let mut in_flight = self.inner.in_flight.lock().await;

            if let Some(state) = in_flight.get(&key) {
                // Another caller is already resolving this key.
                state.clone()
            } else {
                let state = Arc::new(InFlightState::new());
                in_flight.insert(key.clone(), state.clone());
                drop(in_flight);

                let set = candidate::build(entity, &self.inner.config.candidates, override_fn);

                // The attempt runs on a detached task: a caller abandoning
                // interest mid-resolution never cancels the shared work, so
                // other waiters and the permanent cache still get the answer.
                let inner = self.inner.clone();
                let task_state = state.clone();
                let candidates = set.candidates;
                tokio::spawn(async move {
                    // An answer may have been published between the caller's
                    // cache check and its in-flight registration.
                    let prior = { inner.resolved.read().await.get(&key).cloned() };
                    let answer = match prior {
                        Some(answer) => answer,
                        None => inner.attempt(&key, &candidates).await,
                    };

                    {
                        let mut resolved = inner.resolved.write().await;
                        resolved.insert(key.clone(), answer.clone());
                    }
                    {
                        let mut result = task_state.result.lock().await;
                        *result = Some(answer);
                    }
                    // Clear in-flight only after the permanent answer is
                    // published, so a latecomer sees one or the other.
                    {
                        let mut in_flight = inner.in_flight.lock().await;
                        in_flight.remove(&key);
                    }
                    task_state.notify.notify_waiters();
                });

                state
            }
        };

        state.wait().await
    }

    /// Whether a permanent answer (hit or miss) exists for this entity.
    pub async fn is_resolved(&self, entity: &Entity) -> bool {
        let key = candidate::cache_key(entity);
        let resolved = self.inner.resolved.read().await;
        resolved.contains_key(&key)
    }

    /// Number of permanently memoized answers.
    pub async fn resolved_count(&self) -> usize {
        let resolved = self.inner.resolved.read().await;
        resolved.len()
    }

    /// The bounded resource handle cache.
    pub fn resources(&self) -> &ResourceLru<S> {
        &self.inner.resources
    }

    /// The resolver's settings.
    pub fn config(&self) -> &ResolverConfig {
        &self.inner.config
    }
}

impl<S: ImageSource + 'static> Inner<S> {
    /// Run one attempt sequence: candidates strictly in order, first
    /// success wins, total exhaustion yields `None`.
    async fn attempt(&self, key: &str, candidates: &[String]) -> Option<Arc<str>> {
        for url in candidates {
            match self.config.strategy {
                ResolveStrategy::CachedBinary => {
                    if let Some(handle) = self.resources.get(url).await {
                        debug!(key, url = %url, "resource cache hit");
                        return Some(handle.url_arc());
                    }
                    match self.fetch_candidate(url).await {
                        Ok(data) => {
                            let handle = self.source.materialize(url, data).await;
                            let resolved = handle.url_arc();
                            self.resources.insert(url.clone(), handle).await;
                            debug!(key, url = %url, "candidate resolved");
                            return Some(resolved);
                        }
                        Err(err) => {
                            debug!(key, url = %url, error = %err, "candidate failed");
                        }
                    }
                }
                ResolveStrategy::ProbeOnly => {
                    if self.probe_candidate(url).await {
                        debug!(key, url = %url, "candidate resolved by probe");
                        return Some(Arc::from(url.as_str()));
                    }
                    debug!(key, url = %url, "probe failed");
                }
            }
        }

        debug!(key, "all candidates exhausted");
        None
    }

    /// Fetch one candidate's payload, applying the per-candidate timeout
    /// and rejecting empty payloads.
    async fn fetch_candidate(&self, url: &str) -> Result<Bytes, FetchError> {
        let data = match self.config.candidate_timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.fetch(url))
                .await
                .map_err(|_| FetchError::TimedOut {
                    url: url.to_string(),
                    elapsed_ms: limit.as_millis() as u64,
                })??,
            None => self.source.fetch(url).await?,
        };

        if data.is_empty() {
            return Err(FetchError::EmptyPayload {
                url: url.to_string(),
            });
        }
        Ok(data)
    }

    /// Probe one candidate, applying the per-candidate timeout.
    async fn probe_candidate(&self, url: &str) -> bool {
        match self.config.candidate_timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.probe(url))
                .await
                .unwrap_or(false),
            None => self.source.probe(url).await,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    use crate::source::ResourceHandle;

    /// Mock source serving a fixed set of URLs, recording every fetch.
    struct MockSource {
        available: HashSet<String>,
        fetches: StdMutex<Vec<String>>,
        next_id: AtomicU64,
        releases: StdMutex<Vec<String>>,
    }

    impl MockSource {
        fn new(available: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                available: available.iter().map(|s| s.to_string()).collect(),
                fetches: StdMutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                releases: StdMutex::new(Vec::new()),
            })
        }

        fn fetch_count(&self) -> usize {
            self.fetches.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageSource for MockSource {
        async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
            self.fetches.lock().unwrap().push(url.to_string());
            if self.available.contains(url) {
                Ok(Bytes::from_static(b"GIF89a"))
            } else {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            }
        }

        async fn probe(&self, url: &str) -> bool {
            self.fetches.lock().unwrap().push(url.to_string());
            self.available.contains(url)
        }

        async fn materialize(&self, _source_url: &str, _data: Bytes) -> ResourceHandle {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            ResourceHandle::new(format!("mem://{}", id))
        }

        fn release(&self, handle: &ResourceHandle) {
            self.releases.lock().unwrap().push(handle.url().to_string());
        }
    }

    fn test_config() -> ResolverConfig {
        ResolverConfig {
            candidates: CandidateConfig {
                base_paths: vec!["/media".to_string()],
                extensions: vec!["gif".to_string(), "jpg".to_string(), "png".to_string()],
                alt_prefix: None,
            },
            ..ResolverConfig::default()
        }
    }

    #[tokio::test]
    async fn test_first_matching_candidate_wins() {
        let source = MockSource::new(&["/media/X.jpg", "/media/X.png"]);
        let resolver = ImageResolver::with_config(source.clone(), test_config());

        let answer = resolver.resolve_image(&Entity::new(1, "X"), None).await;
        assert!(answer.is_some());

        // gif failed, jpg won, png never tried.
        let fetches = source.fetches.lock().unwrap().clone();
        assert_eq!(fetches, vec!["/media/X.gif", "/media/X.jpg"]);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_and_caches_none() {
        let source = MockSource::new(&[]);
        let resolver = ImageResolver::with_config(source.clone(), test_config());
        let entity = Entity::new(1, "X");

        assert!(resolver.resolve_image(&entity, None).await.is_none());
        assert_eq!(source.fetch_count(), 3);
        assert!(resolver.is_resolved(&entity).await);

        // Permanent miss: no further network access.
        assert!(resolver.resolve_image(&entity, None).await.is_none());
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_repeat_call_uses_memoized_answer() {
        let source = MockSource::new(&["/media/X.gif"]);
        let resolver = ImageResolver::with_config(source.clone(), test_config());
        let entity = Entity::new(1, "X");

        let first = resolver.resolve_image(&entity, None).await;
        let second = resolver.resolve_image(&entity, None).await;

        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_override_takes_precedence() {
        let source = MockSource::new(&["/curated/x.gif", "/media/X.gif"]);
        let resolver = ImageResolver::with_config(source.clone(), test_config());

        let override_fn = |_: &Entity| Some("/curated/x.gif".to_string());
        let answer = resolver
            .resolve_image(&Entity::new(1, "X"), Some(&override_fn))
            .await;

        assert!(answer.is_some());
        let fetches = source.fetches.lock().unwrap().clone();
        assert_eq!(fetches, vec!["/curated/x.gif"]);
    }

    #[tokio::test]
    async fn test_probe_only_resolves_to_candidate_url() {
        let source = MockSource::new(&["/media/X.jpg"]);
        let config = ResolverConfig {
            strategy: ResolveStrategy::ProbeOnly,
            ..test_config()
        };
        let resolver = ImageResolver::with_config(source.clone(), config);

        let answer = resolver.resolve_image(&Entity::new(1, "X"), None).await;
        assert_eq!(answer.as_deref(), Some("/media/X.jpg"));

        // Probe-only retains no binary handles.
        assert!(resolver.resources().is_empty().await);
    }

    #[tokio::test]
    async fn test_resource_cache_hit_skips_fetch() {
        let source = MockSource::new(&["/media/X.gif"]);
        let resolver = ImageResolver::with_config(source.clone(), test_config());

        // Two entities whose first candidate is the same URL.
        let a = Entity::new(1, "X");
        let b = Entity::new(2, "X");

        let first = resolver.resolve_image(&a, None).await.unwrap();
        let second = resolver.resolve_image(&b, None).await.unwrap();

        // Same handle, one fetch: the second resolution hit the LRU.
        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_payload_is_a_failure() {
        struct EmptySource {
            fetches: StdMutex<Vec<String>>,
        }

        #[async_trait]
        impl ImageSource for EmptySource {
            async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
                self.fetches.lock().unwrap().push(url.to_string());
                Ok(Bytes::new())
            }
            async fn probe(&self, _url: &str) -> bool {
                false
            }
            async fn materialize(&self, _source_url: &str, _data: Bytes) -> ResourceHandle {
                ResourceHandle::new("mem://never")
            }
            fn release(&self, _handle: &ResourceHandle) {}
        }

        let source = Arc::new(EmptySource {
            fetches: StdMutex::new(Vec::new()),
        });
        let resolver = ImageResolver::with_config(source.clone(), test_config());

        let answer = resolver.resolve_image(&Entity::new(1, "X"), None).await;
        assert!(answer.is_none());
        assert_eq!(source.fetches.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_slow_candidate_times_out() {
        struct HungSource;

        #[async_trait]
        impl ImageSource for HungSource {
            async fn fetch(&self, _url: &str) -> Result<Bytes, FetchError> {
                // Far longer than the configured timeout.
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Bytes::from_static(b"late"))
            }
            async fn probe(&self, _url: &str) -> bool {
                false
            }
            async fn materialize(&self, _source_url: &str, _data: Bytes) -> ResourceHandle {
                ResourceHandle::new("mem://never")
            }
            fn release(&self, _handle: &ResourceHandle) {}
        }

        let config = ResolverConfig {
            candidate_timeout: Some(Duration::from_millis(20)),
            candidates: CandidateConfig {
                base_paths: vec!["/media".to_string()],
                extensions: vec!["gif".to_string()],
                alt_prefix: None,
            },
            ..ResolverConfig::default()
        };
        let resolver = ImageResolver::with_config(Arc::new(HungSource), config);

        let answer = resolver.resolve_image(&Entity::new(1, "X"), None).await;
        assert!(answer.is_none());
    }

    #[tokio::test]
    async fn test_caller_cancellation_does_not_abort_resolution() {
        struct SlowSource {
            fetches: StdMutex<Vec<String>>,
        }

        #[async_trait]
        impl ImageSource for SlowSource {
            async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
                self.fetches.lock().unwrap().push(url.to_string());
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(Bytes::from_static(b"GIF89a"))
            }
            async fn probe(&self, _url: &str) -> bool {
                false
            }
            async fn materialize(&self, source_url: &str, _data: Bytes) -> ResourceHandle {
                ResourceHandle::new(format!("mem://{}", source_url))
            }
            fn release(&self, _handle: &ResourceHandle) {}
        }

        let source = Arc::new(SlowSource {
            fetches: StdMutex::new(Vec::new()),
        });
        let resolver = ImageResolver::with_config(source.clone(), test_config());
        let entity = Entity::new(1, "X");

        // Start a resolution and drop its future mid-flight.
        {
            let resolver = resolver.clone();
            let entity = entity.clone();
            let task = tokio::spawn(async move {
                resolver.resolve_image(&entity, None).await;
            });
            tokio::time::sleep(Duration::from_millis(10)).await;
            task.abort();
            let _ = task.await;
        }

        // The shared attempt keeps running and publishes its answer.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(resolver.is_resolved(&entity).await);

        // A fresh caller gets the memoized value with no new fetch.
        let before = source.fetches.lock().unwrap().len();
        assert!(resolver.resolve_image(&entity, None).await.is_some());
        assert_eq!(source.fetches.lock().unwrap().len(), before);
    }
}
