//! Best-effort background prewarming.
//!
//! Speculatively resolves a bounded prefix of an entity list before the
//! images are actually needed, so the first render of a list view hits the
//! session cache. Concurrency is bounded by a worker-permit semaphore and
//! every individual outcome is discarded: prewarming can neither fail nor
//! block interactive resolution.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::candidate::OverrideFn;
use crate::entity::Entity;
use crate::source::ImageSource;

use super::resolver::ImageResolver;

impl<S: ImageSource + 'static> ImageResolver<S> {
    /// Resolve up to `count` entities from the front of `entities`.
    ///
    /// Entities that already have a permanent answer are skipped. Each
    /// remaining entity is resolved on its own task, with at most
    /// `prewarm_workers` attempts running at once. Completion is
    /// best-effort: the call returns once every spawned task has finished,
    /// but individual failures (including panics) are silently dropped.
    pub async fn prewarm(
        &self,
        entities: &[Entity],
        override_fn: Option<Arc<OverrideFn>>,
        count: usize,
    ) {
        let take = count.min(entities.len());
        let workers = self.config().prewarm_workers.max(1);
        let semaphore = Arc::new(Semaphore::new(workers));

        let mut tasks = Vec::with_capacity(take);
        for entity in entities.iter().take(take) {
            if self.is_resolved(entity).await {
                continue;
            }

            let resolver = self.clone();
            let entity = entity.clone();
            let override_fn = override_fn.clone();
            let semaphore = semaphore.clone();
            tasks.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let _ = resolver
                    .resolve_image(&entity, override_fn.as_deref())
                    .await;
            }));
        }

        let spawned = tasks.len();
        for task in tasks {
            // A panicked task only loses its own entity.
            let _ = task.await;
        }
        debug!(spawned, "prewarm pass complete");
    }
}

// =============================================================================
// Tests
// =============================================================================
