//! Image source abstraction.
//!
//! The resolver never talks to the network directly. Everything it needs
//! from the platform goes through the [`ImageSource`] trait:
//!
//! - fetching a candidate's binary payload
//! - probing whether a candidate loads as a displayable image
//! - materializing a payload into a process-local [`ResourceHandle`]
//! - releasing a handle when the resource cache evicts it
//!
//! This abstraction keeps the resolver testable with recording mock sources
//! and independent of any particular HTTP client.

mod http;

pub use http::HttpImageSource;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::FetchError;

// =============================================================================
// Resource Handle
// =============================================================================

/// A process-local, revocable reference to fetched binary data.
///
/// Handles stand in for the raw payload so callers can render an image
/// without re-fetching it. A handle stays valid until its source releases
/// it, which happens exactly once, when the resource cache evicts it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    url: Arc<str>,
}

impl ResourceHandle {
    /// Create a handle wrapping a local reference URL.
    pub fn new(url: impl Into<Arc<str>>) -> Self {
        Self { url: url.into() }
    }

    /// The local reference URL for this handle.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The reference URL as a cheaply clonable shared string.
    pub fn url_arc(&self) -> Arc<str> {
        self.url.clone()
    }
}

// =============================================================================
// ImageSource Trait
// =============================================================================

/// Platform seam for fetching, probing, and holding image data.
///
/// Implementations must be thread-safe; the resolver shares one source
/// across all resolutions and the prewarm workers.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the full binary payload at `url`.
    ///
    /// Non-success status, connection failures, and empty payloads are all
    /// reported as [`FetchError`]; the resolver treats every variant as a
    /// transient per-candidate failure.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;

    /// Check whether `url` loads as a displayable image, without retaining
    /// the payload. Used by the probe-only strategy.
    async fn probe(&self, url: &str) -> bool;

    /// Turn a fetched payload into a process-local handle.
    async fn materialize(&self, source_url: &str, data: Bytes) -> ResourceHandle;

    /// Release a handle produced by [`materialize`](Self::materialize).
    ///
    /// The resource cache calls this exactly once per evicted handle.
    fn release(&self, handle: &ResourceHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_url_roundtrip() {
        let handle = ResourceHandle::new("mem://7");
        assert_eq!(handle.url(), "mem://7");
        assert_eq!(&*handle.url_arc(), "mem://7");
    }

    #[test]
    fn test_handle_equality_by_url() {
        assert_eq!(ResourceHandle::new("mem://1"), ResourceHandle::new("mem://1"));
        assert_ne!(ResourceHandle::new("mem://1"), ResourceHandle::new("mem://2"));
    }
}
