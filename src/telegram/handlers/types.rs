//! Handler types and dependencies

use std::sync::Arc;

use crate::core::config::BotConfig;
use crate::download::VideoExtractor;
use crate::telegram::link_cache::LinkCache;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies shared by every handler
#[derive(Clone)]
pub struct HandlerDeps {
    pub config: Arc<BotConfig>,
    pub extractor: Arc<dyn VideoExtractor>,
    pub link_cache: Arc<LinkCache>,
}

impl HandlerDeps {
    pub fn new(config: Arc<BotConfig>, extractor: Arc<dyn VideoExtractor>, link_cache: Arc<LinkCache>) -> Self {
        Self {
            config,
            extractor,
            link_cache,
        }
    }

    /// Builds the dependencies from configuration alone, with a link cache
    /// sized from it.
    pub fn from_config(config: BotConfig, extractor: Arc<dyn VideoExtractor>) -> Self {
        let link_cache = LinkCache::new(config.link_cache_capacity, config.link_cache_retain);
        Self::new(Arc::new(config), extractor, Arc::new(link_cache))
    }
}
