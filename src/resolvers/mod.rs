use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AppConfig, ResolverStrategy};

pub mod album;
pub mod pattern;

pub use album::AlbumResolver;
pub use pattern::PatternResolver;

// Bumped whenever the resolution output shape or naming convention changes;
// persisted cache entries carrying another version are treated as misses.
pub const SCHEMA_VERSION: &str = "2.0";

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("All proxy endpoints failed")]
    AllProxiesFailed,

    #[error("No images found")]
    NoImagesFound,
}

// Strategy turning an asset key into an ordered list of image URLs
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, key: &str) -> Result<Vec<String>, ResolutionError>;

    fn schema_version(&self) -> &'static str {
        SCHEMA_VERSION
    }
}

pub fn for_strategy(config: &AppConfig) -> Arc<dyn Resolver> {
    match config.resolver_strategy {
        ResolverStrategy::Pattern => Arc::new(PatternResolver::new(&config.blob_base_url)),
        ResolverStrategy::Album => Arc::new(AlbumResolver::new(config)),
    }
}
