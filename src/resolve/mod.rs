//! Image resolution layer.
//!
//! This module is the entry point the presentation layer talks to:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           Presentation layer            │
//! └────────────────────┬────────────────────┘
//!                      │ resolve_image / prewarm
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             ImageResolver               │
//! │  ┌─────────────┐  ┌──────────────────┐  │
//! │  │ resolved map│  │ in-flight map    │  │
//! │  │ (permanent) │  │ (singleflight)   │  │
//! │  └─────────────┘  └──────────────────┘  │
//! │  ┌─────────────────────────────────┐    │
//! │  │ ResourceLru (bounded handles)   │    │
//! │  └─────────────────────────────────┘    │
//! └────────────────────┬────────────────────┘
//!                      │ fetch / probe / materialize / release
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            ImageSource                  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`ImageResolver`]: memoized, deduplicating resolution of one winning
//!   image reference per entity, plus best-effort prewarming
//! - [`ResolverConfig`]: strategy, candidate settings, capacities, timeout
//! - [`ResolveStrategy`]: cached-binary vs probe-only candidate handling

mod prewarm;
mod resolver;

pub use resolver::{
    ImageResolver, ResolveStrategy, ResolverConfig, DEFAULT_CANDIDATE_TIMEOUT_MS,
    DEFAULT_PREWARM_WORKERS,
};
