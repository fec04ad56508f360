//! # Sprite Resolver
//!
//! Image candidate resolution and bounded resource caching for a
//! game-monster database admin tool.
//!
//! Most entities in the database have no authoritative image URL. This
//! library guesses plausible image locations from an entity's names, tries
//! them strictly in priority order, and memoizes one winning reference per
//! entity for the rest of the session. Binary payloads live behind
//! process-local handles in a bounded LRU cache, so memory stays flat no
//! matter how many entities get resolved.
//!
//! ## Features
//!
//! - **Candidate generation**: deterministic, ordered URL guesses from name
//!   variants, base paths, and extensions, with override and metadata hooks
//! - **Request deduplication**: concurrent resolutions of the same entity
//!   share exactly one underlying attempt sequence
//! - **Session permanence**: every outcome, including "nothing found", is
//!   cached for the session and never recomputed
//! - **Bounded memory**: LRU eviction of resource handles with guaranteed
//!   single release per evicted handle
//! - **Prewarming**: best-effort, bounded-concurrency background resolution
//!   of upcoming entity lists
//! - **Pixel-art rendering helpers**: integer scale computation and image
//!   kind classification
//!
//! ## Architecture
//!
//! - [`candidate`] - Candidate list and cache key derivation (pure)
//! - [`resolve`] - The resolver: memoization, singleflight, prewarming
//! - [`cache`] - Bounded LRU cache of resource handles
//! - [`source`] - Platform seam: fetch, probe, materialize, release
//! - [`render`] - Integer scaling and image kind classification (pure)
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sprite_resolver::{Entity, HttpImageSource, ImageResolver};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = Arc::new(HttpImageSource::new("https://db.example.com").unwrap());
//!     let resolver = ImageResolver::new(source);
//!
//!     let entity = Entity::new(42, "Dire Wolf").with_alternate_name("Wolf (Dire)");
//!     match resolver.resolve_image(&entity, None).await {
//!         Some(url) => println!("resolved: {}", url),
//!         None => println!("no image; use the placeholder"),
//!     }
//! }
//! ```

pub mod cache;
pub mod candidate;
pub mod config;
pub mod entity;
pub mod error;
pub mod render;
pub mod resolve;
pub mod source;

// Re-export commonly used types
pub use cache::{ResourceLru, DEFAULT_RESOURCE_CACHE_CAPACITY};
pub use candidate::{
    build as build_candidates, cache_key, normalize_name, CandidateConfig, CandidateSet,
    OverrideFn, DEFAULT_ALT_PREFIX, DEFAULT_BASE_PATHS, DEFAULT_EXTENSIONS,
};
pub use config::{Config, StrategyArg, DEFAULT_PREWARM_COUNT};
pub use entity::Entity;
pub use error::FetchError;
pub use render::{
    classify, compute_scale, compute_scale_clamped, Dimensions, ImageKind, DEFAULT_MAX_SCALE,
};
pub use resolve::{
    ImageResolver, ResolveStrategy, ResolverConfig, DEFAULT_CANDIDATE_TIMEOUT_MS,
    DEFAULT_PREWARM_WORKERS,
};
pub use source::{HttpImageSource, ImageSource, ResourceHandle};
