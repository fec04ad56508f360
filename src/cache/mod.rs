//! Bounded caching of materialized image resources.
//!
//! # Components
//!
//! - [`ResourceLru`]: LRU map from source URL to
//!   [`ResourceHandle`](crate::source::ResourceHandle) with guaranteed
//!   release of evicted handles
//!
//! The resource cache bounds process memory: resolved outcomes are memoized
//! forever by the resolver, but the binary payloads behind them live only as
//! long as their handle survives LRU eviction.

mod resource_lru;

pub use resource_lru::{ResourceLru, DEFAULT_RESOURCE_CACHE_CAPACITY};
