use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;

use crate::config::AppConfig;
use crate::resolvers::Resolver;
use crate::store::KvStore;

// Namespace prefix for persisted entries, keeping them clear of unrelated keys
const STORE_KEY_PREFIX: &str = "assets:";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub urls: Vec<String>,
    pub version: String,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: &str, urls: Vec<String>, version: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(24));
        Self {
            key: key.to_string(),
            urls,
            version: version.to_string(),
            fetched_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    // A mismatched version is a miss regardless of expiry
    pub fn is_valid(&self, version: &str) -> bool {
        !self.is_expired() && self.version == version
    }

    pub fn age_secs(&self) -> u64 {
        (Utc::now() - self.fetched_at).num_seconds().max(0) as u64
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub force_refresh: bool,
    pub cache_duration: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ResolvedAssets {
    pub urls: Vec<String>,
    pub from_cache: bool,
    pub cache_age: Option<u64>,
}

impl ResolvedAssets {
    fn fresh(urls: Vec<String>) -> Self {
        Self { urls, from_cache: false, cache_age: None }
    }

    fn cached(entry: &CacheEntry) -> Self {
        Self {
            urls: entry.urls.clone(),
            from_cache: true,
            cache_age: Some(entry.age_secs()),
        }
    }

    fn empty() -> Self {
        Self { urls: Vec::new(), from_cache: false, cache_age: None }
    }
}

// Two-tier cache in front of a Resolver. The in-memory tier lives for the
// process and is only dropped by an explicit clear; the persistent tier
// carries entries across restarts and enforces expiry and schema version.
// Lookups never fail: resolution errors degrade to stale data or an empty
// list.
#[derive(Clone)]
pub struct AssetCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    memory: RwLock<HashMap<String, CacheEntry>>,
    store: KvStore,
    // Per-key locks so concurrent misses collapse into one resolution
    locks: AsyncMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    // Keys with a background refresh already in flight
    refreshing: Mutex<HashSet<String>>,
    background_refresh: bool,
    default_ttl: Duration,
}

impl AssetCache {
    pub fn new(store: KvStore, config: &AppConfig) -> Self {
        Self::with_ttl(
            store,
            Duration::from_secs(config.asset_cache_duration * 60 * 60),
            config.background_refresh,
        )
    }

    pub fn with_ttl(store: KvStore, default_ttl: Duration, background_refresh: bool) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                memory: RwLock::new(HashMap::new()),
                store,
                locks: AsyncMutex::new(HashMap::new()),
                refreshing: Mutex::new(HashSet::new()),
                background_refresh,
                default_ttl,
            }),
        }
    }

    pub async fn get_images(
        &self,
        key: &str,
        resolver: Arc<dyn Resolver>,
        opts: FetchOptions,
    ) -> ResolvedAssets {
        let ttl = opts.cache_duration.unwrap_or(self.inner.default_ttl);
        let version = resolver.schema_version().to_string();

        if !opts.force_refresh {
            if let Some(entry) = self.inner.memory.read().get(key) {
                debug!("In-memory cache hit for {}", key);
                // Keep the warm path warm: refresh once the persisted entry
                // has aged out underneath the memory tier
                if self.inner.background_refresh
                    && !self.persisted(key).map_or(false, |e| e.is_valid(&version))
                {
                    self.spawn_refresh(key, resolver.clone(), ttl);
                }
                return ResolvedAssets::cached(entry);
            }

            if let Some(entry) = self.persisted(key) {
                if entry.is_valid(&version) {
                    debug!("Persistent cache hit for {} (age {}s)", key, entry.age_secs());
                    self.inner.memory.write().insert(key.to_string(), entry.clone());
                    if self.inner.background_refresh {
                        self.spawn_refresh(key, resolver.clone(), ttl);
                    }
                    return ResolvedAssets::cached(&entry);
                }
                debug!(
                    "Persistent entry for {} is {}, treating as miss",
                    key,
                    if entry.version != version { "from another schema version" } else { "expired" }
                );
            }
        }

        // Collapse concurrent misses for the same key into one resolution
        let key_lock = {
            let mut locks = self.inner.locks.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let _guard = key_lock.lock().await;

        // Another caller may have resolved while we waited on the lock
        if !opts.force_refresh {
            if let Some(entry) = self.inner.memory.read().get(key) {
                return ResolvedAssets::cached(entry);
            }
            if let Some(entry) = self.persisted(key) {
                if entry.is_valid(&version) {
                    self.inner.memory.write().insert(key.to_string(), entry.clone());
                    return ResolvedAssets::cached(&entry);
                }
            }
        }

        match resolver.resolve(key).await {
            Ok(urls) if !urls.is_empty() => {
                info!("Resolved {} image(s) for {}", urls.len(), key);
                let entry = CacheEntry::new(key, urls, &version, ttl);
                self.store_entry(&entry);
                ResolvedAssets::fresh(entry.urls)
            }
            Ok(_) => {
                warn!("Resolution for {} returned no images", key);
                self.stale_fallback(key, &version)
            }
            Err(e) => {
                warn!("Resolution for {} failed: {}", key, e);
                self.stale_fallback(key, &version)
            }
        }
    }

    // Best-effort warm-up of every known key; failures already degrade inside
    // get_images, so there is nothing to report here.
    pub async fn prewarm<I>(&self, keys: I, resolver: Arc<dyn Resolver>)
    where
        I: IntoIterator<Item = &'static str>,
    {
        let lookups = keys.into_iter().map(|key| {
            let resolver = resolver.clone();
            async move {
                self.get_images(key, resolver, FetchOptions::default()).await;
            }
        });
        join_all(lookups).await;
        info!("Asset cache prewarm complete");
    }

    pub fn clear(&self, key: &str) {
        self.inner.memory.write().remove(key);
        self.inner.store.delete(&store_key(key));
        info!("Cleared cached assets for {}", key);
    }

    pub fn clear_all<I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.inner.memory.write().clear();
        for key in keys {
            self.inner.store.delete(&store_key(key));
        }
        info!("Cleared all cached assets");
    }

    fn persisted(&self, key: &str) -> Option<CacheEntry> {
        self.inner.store.get_object(&store_key(key))
    }

    fn store_entry(&self, entry: &CacheEntry) {
        self.inner.store.set_object(&store_key(&entry.key), entry);
        self.inner
            .memory
            .write()
            .insert(entry.key.clone(), entry.clone());
    }

    // Expiry is ignored for the fallback read, the schema version is not
    fn stale_fallback(&self, key: &str, version: &str) -> ResolvedAssets {
        match self.persisted(key).filter(|entry| entry.version == version) {
            Some(entry) => {
                warn!(
                    "Serving stale cached assets for {} (age {}s)",
                    key,
                    entry.age_secs()
                );
                ResolvedAssets::cached(&entry)
            }
            None => ResolvedAssets::empty(),
        }
    }

    fn spawn_refresh(&self, key: &str, resolver: Arc<dyn Resolver>, ttl: Duration) {
        {
            let mut refreshing = self.inner.refreshing.lock();
            if !refreshing.insert(key.to_string()) {
                return;
            }
        }

        let cache = self.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            debug!("Background refresh started for {}", key);
            let version = resolver.schema_version().to_string();
            match resolver.resolve(&key).await {
                Ok(urls) if !urls.is_empty() => {
                    info!("Background refresh cached {} URL(s) for {}", urls.len(), key);
                    let entry = CacheEntry::new(&key, urls, &version, ttl);
                    cache.store_entry(&entry);
                }
                Ok(_) => warn!("Background refresh for {} returned no images", key),
                Err(e) => warn!("Background refresh for {} failed: {}", key, e),
            }
            cache.inner.refreshing.lock().remove(&key);
        });
    }
}

fn store_key(key: &str) -> String {
    format!("{}{}", STORE_KEY_PREFIX, key)
}
