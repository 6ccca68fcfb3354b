use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};

use super::{ResolutionError, Resolver};

lazy_static! {
    // Filenames present under <base>/<service-id>/ in blob storage.
    // Gaps in the numbering are real: those uploads never happened.
    static ref FIELDWORK_IMAGES: HashMap<&'static str, &'static [&'static str]> = HashMap::from([
        (
            "carpentry",
            &[
                "Carpentry2.png", "Carpentry3.png", "Carpentry4.png", "Carpentry5.png",
                "Carpentry6.png", "Carpentry7.png", "Carpentry8.png", "Carpentry9.png",
                "Carpentry10.png", "Carpentry11.png", "Carpentry12.png", "Carpentry13.png",
                "Carpentry14.png", "Carpentry15.png",
            ] as &[&str],
        ),
        (
            "construction",
            &[
                "construction1.png", "construction2.png", "construction3.png", "construction5.png",
                "construction6.png", "construction7.png", "construction8.png", "construction9.png",
                "construction10.png", "construction11.png", "construction12.png",
                "construction13.png", "construction14.png", "construction15.png",
            ] as &[&str],
        ),
        (
            "electrician",
            &[
                "electrical1.png", "electrical2.png", "electrical3.png", "electrical4.png",
                "electrical5.png", "electrical7.png", "electrical8.png", "electrical9.png",
            ] as &[&str],
        ),
        (
            "elevations",
            &[
                "elevation1.png", "elevation2.png", "elevation3.png", "elevation4.png",
                "elevation5.png", "elevation6.png", "elevation7.png", "elevation8.png",
            ] as &[&str],
        ),
        (
            "floor-and-tiles",
            &[
                "tile2.png", "tile3.png", "tile4.png", "tile6.png", "tile7.png", "tile8.png",
                "tile9.png", "tile10.png", "tile11.png", "tile13.png", "tile14.png", "tile15.png",
            ] as &[&str],
        ),
        (
            "furnitures",
            &[
                "furniture1.png", "furniture3.png", "furniture4.png", "furniture6.png",
                "furniture7.png", "furniture8.png", "furniture9.png", "furniture10.png",
                "furniture11.png", "furniture13.png", "furniture14.png", "furniture15.png",
            ] as &[&str],
        ),
        (
            "gardening",
            &[
                "gardening1.png", "gardening2.png", "gardening3.png", "gardening4.png",
                "gardening5.png", "gardening6.png", "gardening7.png", "gardening8.png",
                "gardening9.png", "gardening10.png", "gardening11.png", "gardening12.png",
                "gardening13.png", "gardening14.png", "gardening15.png",
            ] as &[&str],
        ),
        (
            "glass-homes",
            &[
                "glass1.png", "glass2.png", "glass3.png", "glass4.png", "glass5.png",
                "glass7.png", "glass8.png", "glass9.png", "glass10.png", "glass11.png",
                "glass13.png", "glass14.png",
            ] as &[&str],
        ),
        (
            "interior-designs",
            &[
                "interior1.png", "interior2.png", "interior3.png", "interior4.png",
                "interior7.png", "interior8.png", "interior9.png", "interior10.png",
                "interior11.png", "interior12.png",
            ] as &[&str],
        ),
        (
            "layout-planning",
            &[
                "layout1.png", "layout2.png", "layout4.png", "layout5.png", "layout6.png",
                "layout7.png", "layout9.png", "layout10.png", "layout11.png", "layout12.png",
                "layout13.png", "layout14.png", "layout15.png",
            ] as &[&str],
        ),
        (
            "office-setup",
            &[
                "office2.png", "office3.png", "office4.png", "office5.png", "office6.png",
                "office7.png", "office9.png", "office12.png", "office13.png", "office14.png",
            ] as &[&str],
        ),
        (
            "painting",
            &[
                "painting1.png", "painting2.png", "painting3.png", "painting4.png",
                "painting5.png", "painting6.png", "painting7.png", "painting8.png",
                "painting10.png", "painting11.png", "painting12.png", "painting14.png",
                "painting15.png",
            ] as &[&str],
        ),
        (
            "plumber",
            &[
                "plumber1.png", "plumber2.png", "plumber3.png", "plumber4.png",
                "plumber5.png", "plumber7.png", "plumber9.png", "plumber11.png",
                "plumber12.png", "plumber13.png", "plumber15.png", "plumber16.png",
            ] as &[&str],
        ),
        (
            "pop-puc-services",
            &[
                "pop1.png", "pop3.png", "pop4.png", "pop5.png", "pop6.png", "pop7.png",
                "pop9.png", "pop10.png", "pop11.png", "pop12.png", "pop14.png",
            ] as &[&str],
        ),
        (
            "raw-materials",
            &[
                "raw1.png", "raw2.png", "raw3.png", "raw4.png", "raw5.png", "raw6.png",
                "raw7.png", "raw8.png", "raw9.png", "raw10.png", "raw11.png", "raw13.png",
                "raw14.png", "raw15.png",
            ] as &[&str],
        ),
        (
            "solar-setup",
            &[
                "solar1.png", "solar2.png", "solar3.png", "solar4.png", "solar5.png",
                "solar6.png", "solar7.png", "solar8.png", "solar9.png", "solar10.png",
                "solar11.png", "solar12.png", "solar13.png", "solar14.png", "solar15.png",
            ] as &[&str],
        ),
        (
            "steel-iron-railings",
            &[
                "railing1.png", "railing2.png", "railing3.png", "railing4.png",
                "railing5.png", "railing6.png", "railing7.png", "railing8.png",
                "railing10.png", "railing11.png", "railing12.png", "railing13.png",
                "railing14.png",
            ] as &[&str],
        ),
        (
            "windows-doors-mesh",
            &[
                "window-Doors1.png", "window-Doors2.png", "window-Doors3.png",
                "window-Doors4.png", "window-Doors5.png", "window-Doors6.png",
                "window-Doors7.png", "window-Doors8.png", "window-Doors9.png",
            ] as &[&str],
        ),
        ("websites-mobile-app-development", &[] as &[&str]),
    ]);
}

// Builds image URLs from the blob storage naming convention. No network
// access; whether a URL is actually reachable is discovered at load time.
#[derive(Clone)]
pub struct PatternResolver {
    base_url: String,
}

impl PatternResolver {
    pub fn new(base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Self { base_url }
    }

    // Unknown keys produce an empty list, not an error
    pub fn lookup(&self, key: &str) -> Vec<String> {
        let Some(filenames) = FIELDWORK_IMAGES.get(key) else {
            warn!("No field work images configured for service: {}", key);
            return Vec::new();
        };

        let urls: Vec<String> = filenames
            .iter()
            .map(|filename| format!("{}{}/{}", self.base_url, key, filename))
            .collect();

        debug!("Generated {} URLs for service: {}", urls.len(), key);
        urls
    }
}

#[async_trait]
impl Resolver for PatternResolver {
    async fn resolve(&self, key: &str) -> Result<Vec<String>, ResolutionError> {
        Ok(self.lookup(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const BASE: &str = "https://kaamlo.blob.core.windows.net/kaamloimages/fieldwork/";

    #[test]
    fn known_key_yields_configured_urls_in_order() {
        let resolver = PatternResolver::new(BASE);
        let urls = resolver.lookup("plumber");

        assert_eq!(urls.len(), 12);
        assert_eq!(
            urls[0],
            "https://kaamlo.blob.core.windows.net/kaamloimages/fieldwork/plumber/plumber1.png"
        );
        assert_eq!(
            urls.last().unwrap().as_str(),
            "https://kaamlo.blob.core.windows.net/kaamloimages/fieldwork/plumber/plumber16.png"
        );

        let unique: HashSet<&String> = urls.iter().collect();
        assert_eq!(unique.len(), urls.len());
    }

    #[test]
    fn lookup_is_deterministic() {
        let resolver = PatternResolver::new(BASE);
        assert_eq!(resolver.lookup("gardening"), resolver.lookup("gardening"));
    }

    #[test]
    fn unknown_key_yields_empty_not_error() {
        let resolver = PatternResolver::new(BASE);
        assert!(resolver.lookup("does-not-exist").is_empty());
    }

    #[test]
    fn configured_but_empty_key_yields_empty() {
        let resolver = PatternResolver::new(BASE);
        assert!(resolver.lookup("websites-mobile-app-development").is_empty());
    }

    #[test]
    fn base_url_without_trailing_slash_is_normalized() {
        let resolver = PatternResolver::new("https://example.com/fieldwork");
        let urls = resolver.lookup("plumber");
        assert_eq!(urls[0], "https://example.com/fieldwork/plumber/plumber1.png");
    }

    #[tokio::test]
    async fn resolver_trait_wraps_the_sync_lookup() {
        let resolver = PatternResolver::new(BASE);
        let urls = resolver.resolve("elevations").await.unwrap();
        assert_eq!(urls, resolver.lookup("elevations"));
    }
}
