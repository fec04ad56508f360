//! Candidate URL generation for entity images.
//!
//! Given an entity, this module derives an ordered list of plausible image
//! locations plus a stable cache key. Generation is pure: no I/O, no side
//! effects, and the same inputs always produce the same list in the same
//! order.
//!
//! # Candidate order
//!
//! 1. The override result, if the caller supplied one and it yields a URL
//! 2. The entity's metadata-supplied image URL, if present
//! 3. The cross product of base paths x name variants x extensions, with an
//!    optional alternate-prefix variant tried directly after each plain name
//!
//! Order encodes priority. Duplicates are tolerated, not deduplicated.

use crate::entity::Entity;

/// Default base paths to probe for guessed filenames.
pub const DEFAULT_BASE_PATHS: &[&str] = &["/media/monsters", "/media/crawl"];

/// Default file extensions, in priority order.
pub const DEFAULT_EXTENSIONS: &[&str] = &["gif", "jpg", "png"];

/// Default alternate filename prefix.
pub const DEFAULT_ALT_PREFIX: &str = "alt_";

/// Punctuation stripped from names when deriving a path segment.
/// Whitespace is stripped as well. This set is fixed: changing it would
/// change generated candidates for every entity.
const STRIPPED_PUNCTUATION: &[char] = &[
    '\'', '"', '.', ',', '!', '?', ':', ';', '(', ')', '[', ']', '/', '\\', '&', '*', '~',
];

/// An override hook letting callers force a specific candidate to the front
/// of the list (e.g., a manually curated image for one record).
pub type OverrideFn = dyn Fn(&Entity) -> Option<String> + Send + Sync;

// =============================================================================
// Configuration
// =============================================================================

/// Settings that shape candidate generation.
///
/// These are fixed for the lifetime of a resolver; the cache key is
/// deliberately independent of them so that tuning base paths or extensions
/// never invalidates previously resolved entries.
#[derive(Debug, Clone)]
pub struct CandidateConfig {
    /// Base paths tried in order (outermost loop)
    pub base_paths: Vec<String>,

    /// File extensions tried in order for each name variant
    pub extensions: Vec<String>,

    /// Optional prefix producing an extra name variant per candidate
    /// (e.g., `alt_slime.gif` directly after `slime.gif`)
    pub alt_prefix: Option<String>,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            base_paths: DEFAULT_BASE_PATHS.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            alt_prefix: Some(DEFAULT_ALT_PREFIX.to_string()),
        }
    }
}

// =============================================================================
// Candidate Set
// =============================================================================

/// The output of candidate generation for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    /// Ordered candidate URLs; order encodes priority
    pub candidates: Vec<String>,

    /// Stable memoization key for this entity's resolution outcome
    pub cache_key: String,
}

/// Build the ordered candidate list and cache key for an entity.
pub fn build(
    entity: &Entity,
    config: &CandidateConfig,
    override_fn: Option<&OverrideFn>,
) -> CandidateSet {
    let variants = name_variants(entity);
    let mut candidates = Vec::new();

    if let Some(f) = override_fn {
        if let Some(url) = f(entity) {
            candidates.push(url);
        }
    }

    if let Some(ref url) = entity.metadata_image_url {
        candidates.push(url.clone());
    }

    for base in &config.base_paths {
        let base = base.trim_end_matches('/');
        for name in &variants {
            for ext in &config.extensions {
                candidates.push(format!("{}/{}.{}", base, name, ext));
                if let Some(ref prefix) = config.alt_prefix {
                    candidates.push(format!("{}/{}{}.{}", base, prefix, name, ext));
                }
            }
        }
    }

    CandidateSet {
        candidates,
        cache_key: cache_key(entity),
    }
}

/// Derive the stable cache key for an entity.
///
/// The key is the entity id plus the sorted, deduplicated set of normalized
/// name variants. It stays stable across changes to base paths, extensions,
/// prefixes, and overrides.
pub fn cache_key(entity: &Entity) -> String {
    let mut variants = name_variants(entity);
    variants.sort();
    variants.dedup();
    format!("{}::{}", entity.id, variants.join("+"))
}

/// Normalize a display name into a safe path segment.
///
/// Strips all whitespace and a fixed punctuation set.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

/// Normalized, deduplicated name variants in declaration order
/// (name first, then alternate name). Empty results are dropped.
fn name_variants(entity: &Entity) -> Vec<String> {
    let mut variants = Vec::with_capacity(2);
    for raw in [Some(entity.name.as_str()), entity.alternate_name.as_deref()]
        .into_iter()
        .flatten()
    {
        let normalized = normalize_name(raw);
        if !normalized.is_empty() && !variants.contains(&normalized) {
            variants.push(normalized);
        }
    }
    variants
}

// =============================================================================
// Tests
// =============================================================================
