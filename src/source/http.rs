//! HTTP-backed image source.
//!
//! Production implementation of [`ImageSource`] that resolves candidate
//! paths against a configured base URL and fetches them with `reqwest`.
//! Materialized payloads are held in an in-process handle table keyed by
//! generated `mem://` URLs; releasing a handle drops its payload.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

use super::{ImageSource, ResourceHandle};

/// HTTP image source with an in-process handle table.
pub struct HttpImageSource {
    client: reqwest::Client,
    base: Url,
    next_handle_id: AtomicU64,
    handles: Mutex<HashMap<Arc<str>, Bytes>>,
}

impl HttpImageSource {
    /// Create a source resolving candidates against `base_url`.
    ///
    /// Candidate paths such as `/media/slime.gif` are joined onto the base;
    /// absolute `http(s)` candidates are used as-is.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            next_handle_id: AtomicU64::new(0),
            handles: Mutex::new(HashMap::new()),
        })
    }

    /// Resolve a candidate into an absolute URL.
    fn absolute(&self, url: &str) -> Result<Url, FetchError> {
        let parsed = if url.starts_with("http://") || url.starts_with("https://") {
            Url::parse(url)
        } else {
            self.base.join(url)
        };
        parsed.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Number of live materialized handles.
    pub fn handle_count(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    /// Look up the payload behind a handle, if it is still live.
    pub fn payload(&self, handle: &ResourceHandle) -> Option<Bytes> {
        self.handles.lock().unwrap().get(&handle.url_arc()).cloned()
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let absolute = self.absolute(url)?;

        let response = self
            .client
            .get(absolute)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let data = response.bytes().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if data.is_empty() {
            return Err(FetchError::EmptyPayload {
                url: url.to_string(),
            });
        }

        Ok(data)
    }

    async fn probe(&self, url: &str) -> bool {
        let absolute = match self.absolute(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        match self.client.get(absolute).send().await {
            Ok(response) => {
                if !response.status().is_success() {
                    return false;
                }
                let is_image = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.starts_with("image/"))
                    .unwrap_or(false);
                is_image && response.content_length() != Some(0)
            }
            Err(err) => {
                debug!(url, error = %err, "probe failed");
                false
            }
        }
    }

    async fn materialize(&self, source_url: &str, data: Bytes) -> ResourceHandle {
        let id = self.next_handle_id.fetch_add(1, Ordering::SeqCst);
        let handle = ResourceHandle::new(format!("mem://{}", id));
        debug!(source_url, handle = handle.url(), size = data.len(), "materialized");
        self.handles.lock().unwrap().insert(handle.url_arc(), data);
        handle
    }

    fn release(&self, handle: &ResourceHandle) {
        debug!(handle = handle.url(), "released");
        self.handles.lock().unwrap().remove(&handle.url_arc());
    }
}
