use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResolverStrategy {
    // Deterministic URLs from the blob storage naming convention
    Pattern,
    // Legacy: scrape the hosted album page through relay endpoints
    Album,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub address: String,
    pub asset_cache_duration: u64,
    pub timeout: u64,
    pub blob_base_url: String,
    pub album_url: String,
    pub resolver_strategy: ResolverStrategy,
    pub background_refresh: bool,
    pub store_path: String,
    pub user_agent: String,
    pub load_timeout: u64,
    pub load_max_attempts: u32,
    pub load_retry_base_ms: u64,
    pub load_retry_cap_ms: u64,
    pub load_min_display_ms: u64,
}
