use std::sync::Arc;
use std::time::Duration;

use crate::cache::ResponseCache;
use crate::config::ServerConfig;

/// Handler state. Clones share the pool, configuration and cache.
#[derive(Clone)]
pub struct AppState {
    pub pool: quill_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Rendered index pages; cleared by the admin endpoint.
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    /// The cache TTL comes from `config.index_cache_secs`.
    pub fn new(pool: quill_db::DbPool, config: ServerConfig) -> Self {
        let ttl = Duration::from_secs(config.index_cache_secs);
        Self {
            pool,
            config: Arc::new(config),
            cache: Arc::new(ResponseCache::new(ttl)),
        }
    }
}
