//! sprite-resolver - resolve monster images for an entity list.
//!
//! Reads a JSON file of entity records, resolves one image per entity
//! against a base URL, and reports each outcome.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sprite_resolver::{Config, Entity, HttpImageSource, ImageResolver};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let entities = match load_entities(&config) {
        Ok(entities) => entities,
        Err(e) => {
            error!("Failed to load entities from {}: {}", config.entities.display(), e);
            return ExitCode::FAILURE;
        }
    };

    info!("Loaded {} entities from {}", entities.len(), config.entities.display());
    info!(
        "Resolving against {} ({} handle slots, {} prewarm workers)",
        config.base_url, config.cache_resources, config.prewarm_workers
    );

    let source = match HttpImageSource::new(&config.base_url) {
        Ok(source) => Arc::new(source),
        Err(e) => {
            error!("Invalid base URL '{}': {}", config.base_url, e);
            return ExitCode::FAILURE;
        }
    };

    let resolver = ImageResolver::with_config(source, config.resolver_config());

    if config.prewarm_count > 0 {
        debug!("Prewarming first {} entities", config.prewarm_count);
        resolver.prewarm(&entities, None, config.prewarm_count).await;
    }

    let mut hits = 0usize;
    for entity in &entities {
        match resolver.resolve_image(entity, None).await {
            Some(url) => {
                hits += 1;
                info!("  {} ({}) -> {}", entity.name, entity.id, url);
            }
            None => {
                warn!("  {} ({}) -> no image found", entity.name, entity.id);
            }
        }
    }

    info!(
        "Resolved {}/{} entities ({} handles live, capacity {})",
        hits,
        entities.len(),
        resolver.resources().len().await,
        resolver.resources().capacity()
    );

    ExitCode::SUCCESS
}

/// Load the entity list from the configured JSON file.
fn load_entities(config: &Config) -> Result<Vec<Entity>, String> {
    let raw = std::fs::read_to_string(&config.entities).map_err(|e| e.to_string())?;
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "sprite_resolver=debug"
    } else {
        "sprite_resolver=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
