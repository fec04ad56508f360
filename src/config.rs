//! Configuration for the sprite-resolver CLI.
//!
//! All options can be set via command-line flags or environment variables
//! with the `SPRITE_` prefix:
//!
//! - `SPRITE_BASE_URL` - Base URL candidates are resolved against (required)
//! - `SPRITE_ENTITIES` - Path to the JSON entity file (required)
//! - `SPRITE_CACHE_RESOURCES` - Resource handle LRU capacity (default: 64)
//! - `SPRITE_BASE_PATHS` - Comma-separated candidate base paths
//! - `SPRITE_EXTENSIONS` - Comma-separated candidate extensions
//! - `SPRITE_ALT_PREFIX` - Alternate filename prefix (empty disables)
//! - `SPRITE_STRATEGY` - `cached-binary` or `probe-only`
//! - `SPRITE_CANDIDATE_TIMEOUT_MS` - Per-candidate timeout (0 disables)
//! - `SPRITE_PREWARM_WORKERS` - Concurrent prewarm workers (default: 4)
//! - `SPRITE_PREWARM_COUNT` - Entities to prewarm before resolving (default: 0)

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::cache::DEFAULT_RESOURCE_CACHE_CAPACITY;
use crate::candidate::{CandidateConfig, DEFAULT_ALT_PREFIX, DEFAULT_BASE_PATHS, DEFAULT_EXTENSIONS};
use crate::resolve::{
    ResolveStrategy, ResolverConfig, DEFAULT_CANDIDATE_TIMEOUT_MS, DEFAULT_PREWARM_WORKERS,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default number of entities to prewarm before resolving.
pub const DEFAULT_PREWARM_COUNT: usize = 0;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Candidate attempt strategy, as a CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Fetch payloads and keep local handles in the bounded cache
    CachedBinary,
    /// Only probe that candidates load; retain nothing
    ProbeOnly,
}

impl From<StrategyArg> for ResolveStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::CachedBinary => ResolveStrategy::CachedBinary,
            StrategyArg::ProbeOnly => ResolveStrategy::ProbeOnly,
        }
    }
}

/// sprite-resolver - resolve monster images for an entity list.
///
/// Reads a JSON file of entity records, guesses and resolves one image per
/// entity against a base URL, and reports the outcome of each resolution.
#[derive(Parser, Debug, Clone)]
#[command(name = "sprite-resolver")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Input
    // =========================================================================
    /// Base URL candidate paths are resolved against.
    #[arg(long, env = "SPRITE_BASE_URL")]
    pub base_url: String,

    /// Path to a JSON file containing an array of entity records.
    #[arg(long, env = "SPRITE_ENTITIES")]
    pub entities: PathBuf,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Maximum number of materialized resource handles to keep alive.
    #[arg(long, default_value_t = DEFAULT_RESOURCE_CACHE_CAPACITY, env = "SPRITE_CACHE_RESOURCES")]
    pub cache_resources: usize,

    // =========================================================================
    // Candidate Configuration
    // =========================================================================
    /// Base paths probed for guessed filenames (comma-separated, in order).
    #[arg(long, env = "SPRITE_BASE_PATHS", value_delimiter = ',')]
    pub base_paths: Option<Vec<String>>,

    /// File extensions tried per name variant (comma-separated, in order).
    #[arg(long, env = "SPRITE_EXTENSIONS", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Alternate filename prefix. Pass an empty string to disable.
    #[arg(long, default_value = DEFAULT_ALT_PREFIX, env = "SPRITE_ALT_PREFIX")]
    pub alt_prefix: String,

    // =========================================================================
    // Resolution Configuration
    // =========================================================================
    /// Candidate attempt strategy.
    #[arg(long, value_enum, default_value = "cached-binary", env = "SPRITE_STRATEGY")]
    pub strategy: StrategyArg,

    /// Per-candidate timeout in milliseconds. 0 disables the bound.
    #[arg(long, default_value_t = DEFAULT_CANDIDATE_TIMEOUT_MS, env = "SPRITE_CANDIDATE_TIMEOUT_MS")]
    pub candidate_timeout_ms: u64,

    /// Maximum concurrent prewarm workers.
    #[arg(long, default_value_t = DEFAULT_PREWARM_WORKERS, env = "SPRITE_PREWARM_WORKERS")]
    pub prewarm_workers: usize,

    /// Number of entities to prewarm before the main resolution pass.
    #[arg(long, default_value_t = DEFAULT_PREWARM_COUNT, env = "SPRITE_PREWARM_COUNT")]
    pub prewarm_count: usize,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Base URL is required. Set --base-url or SPRITE_BASE_URL".to_string());
        }

        if self.cache_resources == 0 {
            return Err("cache_resources must be greater than 0".to_string());
        }

        if self.prewarm_workers == 0 {
            return Err("prewarm_workers must be greater than 0".to_string());
        }

        if let Some(ref base_paths) = self.base_paths {
            if base_paths.is_empty() || base_paths.iter().any(|p| p.is_empty()) {
                return Err("base_paths entries must be non-empty".to_string());
            }
        }

        if let Some(ref extensions) = self.extensions {
            if extensions.is_empty() || extensions.iter().any(|e| e.is_empty()) {
                return Err("extensions entries must be non-empty".to_string());
            }
        }

        Ok(())
    }

    /// Build the candidate settings from this configuration.
    pub fn candidate_config(&self) -> CandidateConfig {
        let base_paths = self
            .base_paths
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_PATHS.iter().map(|s| s.to_string()).collect());
        let extensions = self
            .extensions
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect());
        let alt_prefix = if self.alt_prefix.is_empty() {
            None
        } else {
            Some(self.alt_prefix.clone())
        };

        CandidateConfig {
            base_paths,
            extensions,
            alt_prefix,
        }
    }

    /// Build the resolver settings from this configuration.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            strategy: self.strategy.into(),
            candidates: self.candidate_config(),
            resource_capacity: self.cache_resources,
            candidate_timeout: match self.candidate_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
            prewarm_workers: self.prewarm_workers,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            base_url: "https://db.example.com".to_string(),
            entities: PathBuf::from("entities.json"),
            cache_resources: 32,
            base_paths: None,
            extensions: None,
            alt_prefix: DEFAULT_ALT_PREFIX.to_string(),
            strategy: StrategyArg::CachedBinary,
            candidate_timeout_ms: 5_000,
            prewarm_workers: 4,
            prewarm_count: 10,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_empty_base_url() {
        let mut config = test_config();
        config.base_url = String::new();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Base URL"));
    }

    #[test]
    fn test_zero_cache_capacity() {
        let mut config = test_config();
        config.cache_resources = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_prewarm_workers() {
        let mut config = test_config();
        config.prewarm_workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_base_path_entry_rejected() {
        let mut config = test_config();
        config.base_paths = Some(vec![String::new(), "/media".to_string()]);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("base_paths"));
    }

    #[test]
    fn test_empty_extension_entry_rejected() {
        let mut config = test_config();
        config.extensions = Some(vec!["gif".to_string(), String::new()]);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("extensions"));
    }

    #[test]
    fn test_explicit_non_empty_lists_accepted() {
        let mut config = test_config();
        config.base_paths = Some(vec!["/media".to_string()]);
        config.extensions = Some(vec!["gif".to_string(), "png".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_candidate_config_defaults() {
        let candidates = test_config().candidate_config();
        assert_eq!(candidates.base_paths, DEFAULT_BASE_PATHS);
        assert_eq!(candidates.extensions, DEFAULT_EXTENSIONS);
        assert_eq!(candidates.alt_prefix.as_deref(), Some(DEFAULT_ALT_PREFIX));
    }

    #[test]
    fn test_empty_alt_prefix_disables_variant() {
        let mut config = test_config();
        config.alt_prefix = String::new();
        assert!(config.candidate_config().alt_prefix.is_none());
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let mut config = test_config();
        config.candidate_timeout_ms = 0;
        assert!(config.resolver_config().candidate_timeout.is_none());

        config.candidate_timeout_ms = 250;
        assert_eq!(
            config.resolver_config().candidate_timeout,
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_strategy_mapping() {
        let mut config = test_config();
        config.strategy = StrategyArg::ProbeOnly;
        assert_eq!(config.resolver_config().strategy, ResolveStrategy::ProbeOnly);
    }
}
