use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use serde_json::Value;
use url::{form_urlencoded, Url};

use super::{ResolutionError, Resolver};
use crate::config::AppConfig;

// Host serving the album's raster files
const IMAGE_HOST: &str = "i.ibb.co";

// Bodies at or below this length are error pages masquerading as success
const MIN_BODY_LEN: usize = 100;

// How a relay endpoint wraps the fetched page
#[derive(Debug, Clone, Copy)]
enum ResponseUnwrap {
    // JSON envelope with the page under a `contents`/`data` field
    JsonContents,
    // Body is the page itself
    Raw,
}

struct ProxyEndpoint {
    name: &'static str,
    base: &'static str,
    // Query parameter carrying the target URL; None appends it as the raw query
    param: Option<&'static str>,
    unwrap: ResponseUnwrap,
}

impl ProxyEndpoint {
    fn url_for(&self, target: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
        match self.param {
            Some(param) => format!("{}?{}={}", self.base, param, encoded),
            None => format!("{}?{}", self.base, encoded),
        }
    }
}

// Iterated in priority order; the first endpoint returning a usable body wins
const PROXY_ENDPOINTS: [ProxyEndpoint; 3] = [
    ProxyEndpoint {
        name: "allorigins",
        base: "https://api.allorigins.win/get",
        param: Some("url"),
        unwrap: ResponseUnwrap::JsonContents,
    },
    ProxyEndpoint {
        name: "corsproxy",
        base: "https://corsproxy.io/",
        param: None,
        unwrap: ResponseUnwrap::Raw,
    },
    ProxyEndpoint {
        name: "codetabs",
        base: "https://api.codetabs.com/v1/proxy",
        param: Some("quest"),
        unwrap: ResponseUnwrap::Raw,
    },
];

lazy_static! {
    static ref BARE_IMAGE_URL: Regex =
        Regex::new(r#"https://i\.ibb\.co/[A-Za-z0-9]+/[^"'\s<>)]+\.(?:jpe?g|png)"#)
            .expect("valid image URL pattern");
    static ref NAME_SEPARATORS: Regex =
        Regex::new(r"[-\s]+").expect("valid separator pattern");

    // Album filenames each service is expected to appear under. Several
    // services share an upload, and casing drifted over time, hence the
    // alias lists.
    static ref EXPECTED_FILENAMES: HashMap<&'static str, &'static [&'static str]> =
        HashMap::from([
            (
                "websites-mobile-app-development",
                &["websitemobile.jpg", "website-mobile.jpg", "Website Mobile.jpg"] as &[&str],
            ),
            (
                "solar-setup",
                &["Solar.jpg", "solar.jpg", "Solar Setup.jpg", "solar-setup.jpg", "Solar.png", "solar.png"] as &[&str],
            ),
            ("plumber", &["plumber.jpg"] as &[&str]),
            ("electrician", &["electrician.jpg"] as &[&str]),
            ("interior-designs", &["interior.jpg"] as &[&str]),
            ("painting", &["painting.jpg"] as &[&str]),
            ("construction", &["construction.jpg"] as &[&str]),
            ("gardening", &["gardening.jpg"] as &[&str]),
            ("carpentry", &["carpentry.jpg"] as &[&str]),
            ("furnitures", &["furnitures.jpg"] as &[&str]),
            ("elevations", &["elevation.jpg"] as &[&str]),
            ("floor-and-tiles", &["floor And Tiles.jpg"] as &[&str]),
            ("glass-homes", &["railing Glass.jpg"] as &[&str]),
            ("layout-planning", &["layout Planning.jpg"] as &[&str]),
            ("office-setup", &["office Setup.jpg"] as &[&str]),
            ("windows-doors-mesh", &["window Doors.jpg"] as &[&str]),
            ("steel-iron-railings", &["railings.jpg"] as &[&str]),
            ("pop-puc-services", &["pop.jpg"] as &[&str]),
            ("raw-materials", &["raw Materials.jpg"] as &[&str]),
        ]);
}

// Legacy resolution path: scrapes the hosted album page through relay
// endpoints and matches extracted URLs against per-service filename aliases.
// Superseded by the blob storage naming convention (PatternResolver).
#[derive(Clone)]
pub struct AlbumResolver {
    client: Client,
    album_url: String,
}

impl AlbumResolver {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            album_url: config.album_url.clone(),
        }
    }

    async fn fetch_album_page(&self) -> Result<String, ResolutionError> {
        for endpoint in &PROXY_ENDPOINTS {
            let proxy_url = endpoint.url_for(&self.album_url);
            info!("Trying relay endpoint {} for {}", endpoint.name, self.album_url);

            let response = match self
                .client
                .get(&proxy_url)
                .header("Accept", "application/json, text/html, */*")
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("Relay {} failed, trying next: {}", endpoint.name, e);
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                warn!("Relay {} returned status {}, trying next", endpoint.name, status);
                continue;
            }

            let Some(body) = read_body(endpoint, response).await else {
                warn!("Relay {} returned an unreadable body, trying next", endpoint.name);
                continue;
            };

            if body.len() > MIN_BODY_LEN {
                info!(
                    "Fetched album page via {} ({} bytes)",
                    endpoint.name,
                    body.len()
                );
                return Ok(body);
            }

            warn!(
                "Relay {} returned a suspiciously short body ({} bytes), trying next",
                endpoint.name,
                body.len()
            );
        }

        Err(ResolutionError::AllProxiesFailed)
    }
}

#[async_trait]
impl Resolver for AlbumResolver {
    async fn resolve(&self, key: &str) -> Result<Vec<String>, ResolutionError> {
        let html = self.fetch_album_page().await?;

        let extracted = extract_image_urls(&html);
        info!("Found {} image URLs in album page", extracted.len());
        if extracted.is_empty() {
            return Err(ResolutionError::NoImagesFound);
        }

        let matched = match_urls_for_key(key, &extracted);
        if matched.is_empty() {
            return Err(ResolutionError::NoImagesFound);
        }
        Ok(matched)
    }
}

async fn read_body(endpoint: &ProxyEndpoint, response: Response) -> Option<String> {
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();

    match endpoint.unwrap {
        ResponseUnwrap::JsonContents if content_type.contains("application/json") => {
            let json = response.json::<Value>().await.ok()?;
            unwrap_json(&json)
        }
        _ => response.text().await.ok(),
    }
}

fn unwrap_json(json: &Value) -> Option<String> {
    if let Some(s) = json.as_str() {
        return Some(s.to_string());
    }
    json.get("contents")
        .or_else(|| json.get("data"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

// Candidate URLs come from hyperlinks, image sources, lazy-load attributes
// and bare URLs in text; each is normalized and deduplicated, keeping
// first-seen order.
fn extract_image_urls(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    let document = Html::parse_document(html);
    let attribute_passes = [
        ("a[href]", "href"),
        ("img[src]", "src"),
        ("img[data-src]", "data-src"),
        ("img[data-lazy-src]", "data-lazy-src"),
    ];

    for (selector, attr) in attribute_passes {
        if let Ok(selector) = Selector::parse(selector) {
            for element in document.select(&selector) {
                if let Some(value) = element.value().attr(attr) {
                    push_candidate(value, &mut seen, &mut urls);
                }
            }
        }
    }

    for found in BARE_IMAGE_URL.find_iter(html) {
        push_candidate(found.as_str(), &mut seen, &mut urls);
    }

    urls
}

fn push_candidate(candidate: &str, seen: &mut HashSet<String>, urls: &mut Vec<String>) {
    let normalized = normalize_url(candidate);
    if !is_album_image_url(&normalized) {
        return;
    }
    if seen.insert(normalized.clone()) {
        urls.push(normalized);
    }
}

// Query string and fragment never identify a distinct image
fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or(raw)
            .to_string(),
    }
}

fn is_album_image_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.host_str() != Some(IMAGE_HOST) {
        return false;
    }
    let path = parsed.path().to_ascii_lowercase();
    path.ends_with(".jpg") || path.ends_with(".jpeg") || path.ends_with(".png")
}

#[derive(Debug, Clone, Copy)]
enum MatchLevel {
    Exact,
    Normalized,
    Stem,
}

// Exact filename matches are preferred; only when a level yields nothing do
// we fall through to looser matching.
fn match_urls_for_key(key: &str, extracted: &[String]) -> Vec<String> {
    let Some(expected) = EXPECTED_FILENAMES.get(key) else {
        warn!("No album filenames configured for service: {}", key);
        return Vec::new();
    };

    let candidates: Vec<(String, &str)> = extracted
        .iter()
        .filter_map(|url| filename_of(url).map(|name| (name, url.as_str())))
        .collect();

    for level in [MatchLevel::Exact, MatchLevel::Normalized, MatchLevel::Stem] {
        let hits: Vec<String> = candidates
            .iter()
            .filter(|(name, _)| expected.iter().any(|e| matches_at(level, name, e)))
            .map(|(_, url)| url.to_string())
            .collect();
        if !hits.is_empty() {
            info!("Matched {} image(s) for {} at {:?} level", hits.len(), key, level);
            return hits;
        }
    }

    warn!("No match found for {} (tried: {})", key, expected.join(", "));
    Vec::new()
}

fn matches_at(level: MatchLevel, filename: &str, expected: &str) -> bool {
    let expected = expected.to_ascii_lowercase();
    match level {
        MatchLevel::Exact => filename == expected,
        MatchLevel::Normalized => normalize_name(filename) == normalize_name(&expected),
        MatchLevel::Stem => {
            let candidate = stem(&normalize_name(filename));
            let wanted = stem(&normalize_name(&expected));
            candidate == wanted || candidate.contains(&wanted) || wanted.contains(&candidate)
        }
    }
}

fn normalize_name(name: &str) -> String {
    NAME_SEPARATORS.replace_all(name, "-").to_string()
}

fn stem(name: &str) -> String {
    for ext in [".jpeg", ".jpg", ".png"] {
        if let Some(stripped) = name.strip_suffix(ext) {
            return stripped.to_string();
        }
    }
    name.to_string()
}

fn filename_of(url: &str) -> Option<String> {
    let name = url.rsplit('/').next()?;
    if name.is_empty() {
        return None;
    }
    Some(name.replace("%20", " ").to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_and_src_duplicates_collapse_to_one_entry() {
        let html = r#"
            <div>
              <a href="https://i.ibb.co/G4zWDw4H/plumber.jpg">
                <img src="https://i.ibb.co/G4zWDw4H/plumber.jpg">
              </a>
            </div>
        "#;
        let urls = extract_image_urls(html);
        assert_eq!(urls, vec!["https://i.ibb.co/G4zWDw4H/plumber.jpg".to_string()]);
    }

    #[test]
    fn query_strings_and_fragments_are_stripped_before_dedup() {
        let html = r#"
            <a href="https://i.ibb.co/abc123/solar.jpg?w=300#top"></a>
            <img src="https://i.ibb.co/abc123/solar.jpg?w=800">
        "#;
        let urls = extract_image_urls(html);
        assert_eq!(urls, vec!["https://i.ibb.co/abc123/solar.jpg".to_string()]);
    }

    #[test]
    fn lazy_load_attributes_are_scanned() {
        let html = r#"<img data-src="https://i.ibb.co/xyz987/gardening.png">"#;
        let urls = extract_image_urls(html);
        assert_eq!(urls, vec!["https://i.ibb.co/xyz987/gardening.png".to_string()]);
    }

    #[test]
    fn bare_urls_in_text_are_found() {
        let html = "some inline script: \"https://i.ibb.co/q1w2e3/electrician.jpg\" end";
        let urls = extract_image_urls(html);
        assert_eq!(urls, vec!["https://i.ibb.co/q1w2e3/electrician.jpg".to_string()]);
    }

    #[test]
    fn foreign_hosts_and_non_raster_paths_are_rejected() {
        let html = r#"
            <img src="https://example.com/plumber.jpg">
            <a href="https://i.ibb.co/album/5Wm12k"></a>
        "#;
        assert!(extract_image_urls(html).is_empty());
    }

    #[test]
    fn extraction_preserves_first_seen_order() {
        let html = r#"
            <a href="https://i.ibb.co/aaa111/painting.jpg"></a>
            <a href="https://i.ibb.co/bbb222/carpentry.jpg"></a>
            <img src="https://i.ibb.co/aaa111/painting.jpg">
        "#;
        let urls = extract_image_urls(html);
        assert_eq!(
            urls,
            vec![
                "https://i.ibb.co/aaa111/painting.jpg".to_string(),
                "https://i.ibb.co/bbb222/carpentry.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn proxy_templates_percent_encode_the_target() {
        let target = "https://ibb.co/album/5Wm12k";
        assert_eq!(
            PROXY_ENDPOINTS[0].url_for(target),
            "https://api.allorigins.win/get?url=https%3A%2F%2Fibb.co%2Falbum%2F5Wm12k"
        );
        assert_eq!(
            PROXY_ENDPOINTS[1].url_for(target),
            "https://corsproxy.io/?https%3A%2F%2Fibb.co%2Falbum%2F5Wm12k"
        );
        assert_eq!(
            PROXY_ENDPOINTS[2].url_for(target),
            "https://api.codetabs.com/v1/proxy?quest=https%3A%2F%2Fibb.co%2Falbum%2F5Wm12k"
        );
    }

    #[test]
    fn json_envelopes_unwrap_contents_then_data() {
        let contents = serde_json::json!({ "contents": "<html>page</html>" });
        assert_eq!(unwrap_json(&contents).as_deref(), Some("<html>page</html>"));

        let data = serde_json::json!({ "data": "<html>alt</html>" });
        assert_eq!(unwrap_json(&data).as_deref(), Some("<html>alt</html>"));

        let plain = serde_json::json!("<html>raw</html>");
        assert_eq!(unwrap_json(&plain).as_deref(), Some("<html>raw</html>"));

        let neither = serde_json::json!({ "status": { "http_code": 500 } });
        assert_eq!(unwrap_json(&neither), None);
    }

    #[test]
    fn exact_filename_match_wins() {
        let extracted = vec![
            "https://i.ibb.co/one/plumber.jpg".to_string(),
            "https://i.ibb.co/two/plumbering.jpg".to_string(),
        ];
        let matched = match_urls_for_key("plumber", &extracted);
        assert_eq!(matched, vec!["https://i.ibb.co/one/plumber.jpg".to_string()]);
    }

    #[test]
    fn separator_normalization_matches_spaced_names() {
        // Album upload carried hyphens where the expected name carries spaces
        let extracted = vec!["https://i.ibb.co/zC2zJKV/floor-And-Tiles.jpg".to_string()];
        let matched = match_urls_for_key("floor-and-tiles", &extracted);
        assert_eq!(matched, extracted);
    }

    #[test]
    fn percent_encoded_spaces_match_too() {
        let extracted = vec!["https://i.ibb.co/qMjQPmXc/office%20Setup.jpg".to_string()];
        let matched = match_urls_for_key("office-setup", &extracted);
        assert_eq!(matched, extracted);
    }

    #[test]
    fn stem_containment_is_the_last_resort() {
        let extracted = vec!["https://i.ibb.co/NgFtM13V/solar-panel-install.jpg".to_string()];
        let matched = match_urls_for_key("solar-setup", &extracted);
        assert_eq!(matched, extracted);
    }

    #[test]
    fn unknown_key_matches_nothing() {
        let extracted = vec!["https://i.ibb.co/one/plumber.jpg".to_string()];
        assert!(match_urls_for_key("not-a-service", &extracted).is_empty());
    }
}
