use thiserror::Error;

/// Errors from a single candidate fetch or probe attempt.
///
/// These are transient by design: the resolver absorbs them and advances to
/// the next candidate. No variant ever reaches the presentation layer:
/// total exhaustion is surfaced as `None`, not as an error.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Non-success HTTP status for a candidate URL
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Network or connection error
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Fetch succeeded but the payload was empty
    #[error("Empty payload for {url}")]
    EmptyPayload { url: String },

    /// Candidate attempt exceeded the configured per-candidate timeout
    #[error("Timed out after {elapsed_ms}ms for {url}")]
    TimedOut { url: String, elapsed_ms: u64 },
}

impl FetchError {
    /// The candidate URL this error refers to.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Network { url, .. }
            | FetchError::EmptyPayload { url }
            | FetchError::TimedOut { url, .. } => url,
        }
    }
}
