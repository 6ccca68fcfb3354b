use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use rocket::http::{ContentType, Header, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::{delete, get, State};
use serde::Serialize;

use crate::api::ApiError;
use crate::cache::{AssetCache, FetchOptions, ImageCache};
use crate::catalog;
use crate::config::AppConfig;
use crate::images::{ImageFetcher, LoadSupervisor, RetryPolicy};
use crate::models::AssetUrlsResponse;
use crate::resolvers::Resolver;

// Resolution failures never surface as errors here: an unknown or
// unresolvable key is an empty list for the caller to render as such.
#[get("/<key>?<force_refresh>")]
pub async fn get_assets(
    key: &str,
    force_refresh: Option<bool>,
    asset_cache: &State<AssetCache>,
    resolver: &State<Arc<dyn Resolver>>,
    config: &State<AppConfig>,
) -> JsonWithCache<AssetUrlsResponse> {
    let resolved = asset_cache
        .get_images(
            key,
            resolver.inner().clone(),
            FetchOptions {
                force_refresh: force_refresh.unwrap_or(false),
                cache_duration: None,
            },
        )
        .await;

    JsonWithCache {
        inner: AssetUrlsResponse {
            data: resolved.urls,
            from_cache: resolved.from_cache,
            cache_age: resolved.cache_age,
        },
        from_cache: resolved.from_cache,
        cache_age: resolved.cache_age,
        cache_duration: config.asset_cache_duration * 60 * 60,
    }
}

#[get("/<key>/image?<url>")]
pub async fn proxy_image(
    key: &str,
    url: &str,
    asset_cache: &State<AssetCache>,
    resolver: &State<Arc<dyn Resolver>>,
    config: &State<AppConfig>,
    image_cache: &State<ImageCache>,
    fetcher: &State<ImageFetcher>,
) -> Result<ImageResponse, ApiError> {
    // Only serve URLs that belong to the key's resolved collection
    let resolved = asset_cache
        .get_images(key, resolver.inner().clone(), FetchOptions::default())
        .await;
    if !resolved.urls.iter().any(|candidate| candidate == url) {
        warn!("URL '{}' does not belong to collection '{}'", url, key);
        return Err(ApiError::NotInCollection(format!(
            "URL '{}' does not belong to collection '{}'",
            url, key
        )));
    }

    if let Some((data, content_type)) = image_cache.get(url) {
        info!("Image cache hit: {}", url);
        return Ok(ImageResponse { data, content_type });
    }

    // The minimum-display hold is for visible loaders; serving bytes should
    // not wait on it
    let mut policy = RetryPolicy::from_config(config.inner());
    policy.min_display = Duration::ZERO;
    let supervisor = LoadSupervisor::new(policy);

    let fetcher = fetcher.inner();
    match supervisor
        .run(url, |request_url| async move { fetcher.fetch(&request_url).await })
        .await
    {
        Ok((data, content_type)) => {
            image_cache.store(url, data.clone(), content_type.clone());
            Ok(ImageResponse { data, content_type })
        }
        Err(e) => Err(ApiError::LoadFailed(e)),
    }
}

#[delete("/<key>/cache")]
pub fn clear_key_cache(key: &str, asset_cache: &State<AssetCache>) -> Status {
    asset_cache.clear(key);
    Status::NoContent
}

#[delete("/cache")]
pub fn clear_all_caches(asset_cache: &State<AssetCache>) -> Status {
    asset_cache.clear_all(catalog::service_ids());
    Status::NoContent
}

// Responder for image data
pub struct ImageResponse {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl<'r> Responder<'r, 'static> for ImageResponse {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let content_type = match self.content_type.as_str() {
            "image/jpeg" => ContentType::JPEG,
            "image/png" => ContentType::PNG,
            "image/gif" => ContentType::GIF,
            "image/webp" => ContentType::new("image", "webp"),
            "image/bmp" => ContentType::new("image", "bmp"),
            _ => ContentType::JPEG,
        };

        let etag = format!("\"{:x}\"", md5::compute(&self.data));
        if let Some(if_none_match) = req.headers().get_one("If-None-Match") {
            if if_none_match == etag {
                return Response::build()
                    .status(Status::NotModified)
                    .header(Header::new("ETag", etag))
                    .header(Header::new("Cache-Control", "public, max-age=86400"))
                    .ok();
            }
        }

        Response::build()
            .header(content_type)
            .header(Header::new("Cache-Control", "public, max-age=86400"))
            .header(Header::new("ETag", etag))
            .sized_body(None, Cursor::new(self.data))
            .ok()
    }
}

pub struct JsonWithCache<T> {
    pub inner: T,
    pub from_cache: bool,
    pub cache_age: Option<u64>,
    pub cache_duration: u64,
}

impl<'r, T: Serialize> Responder<'r, 'static> for JsonWithCache<T> {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Response::build();
        response.header(ContentType::JSON);
        if self.from_cache {
            // Remaining lifetime of the cached entry
            let max_age = self
                .cache_age
                .map(|age| self.cache_duration.saturating_sub(age))
                .unwrap_or(self.cache_duration);
            response.header(Header::new(
                "Cache-Control",
                format!("public, max-age={}", max_age),
            ));
        } else {
            response.header(Header::new(
                "Cache-Control",
                format!("public, max-age={}", self.cache_duration),
            ));
        }
        match serde_json::to_vec(&self.inner) {
            Ok(body) => {
                response.sized_body(None, Cursor::new(body));
                response.ok()
            }
            Err(_) => Err(Status::InternalServerError),
        }
    }
}
