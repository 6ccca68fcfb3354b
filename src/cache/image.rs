use std::collections::HashMap;

use parking_lot::RwLock;

// Bytes of already-loaded images, keyed by URL. Lives for the process
// lifetime; the URLs themselves carry content hashes upstream, so entries
// never go stale.
pub struct ImageCache {
    images: RwLock<HashMap<String, (Vec<u8>, String)>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self {
            images: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, url: &str) -> Option<(Vec<u8>, String)> {
        self.images.read().get(url).cloned()
    }

    pub fn store(&self, url: &str, data: Vec<u8>, content_type: String) {
        self.images.write().insert(url.to_string(), (data, content_type));
    }

    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_bytes_with_content_type() {
        let cache = ImageCache::new();
        assert!(cache.get("https://a/1.png").is_none());

        cache.store("https://a/1.png", vec![1, 2, 3], "image/png".to_string());
        let (bytes, content_type) = cache.get("https://a/1.png").unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(content_type, "image/png");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn last_write_wins_per_url() {
        let cache = ImageCache::new();
        cache.store("u", vec![1], "image/png".to_string());
        cache.store("u", vec![2], "image/jpeg".to_string());
        let (bytes, content_type) = cache.get("u").unwrap();
        assert_eq!(bytes, vec![2]);
        assert_eq!(content_type, "image/jpeg");
    }
}
