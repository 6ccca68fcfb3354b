use std::time::Duration;

use log::error;
use reqwest::Client;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Image request failed with status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Image load timed out after {0:?}")]
    Timeout(Duration),

    #[error("Load cancelled")]
    Cancelled,
}

pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<(Vec<u8>, String), LoadError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "image/avif,image/webp,image/png,image/*;q=0.8,*/*;q=0.5")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Image request failed with status {}: {}", status, url);
            return Err(LoadError::Status(status));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = response.bytes().await?.to_vec();

        // Blob storage sometimes hands back a generic content type
        let content_type = if content_type == "application/octet-stream" || content_type.is_empty() {
            sniff_content_type(&data).to_string()
        } else {
            content_type
        };

        Ok((data, content_type))
    }
}

// Detect the image type from file signatures when headers are unhelpful
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    if data.len() < 8 {
        return "application/octet-stream";
    }

    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if data.starts_with(&[0x47, 0x49, 0x46, 0x38]) {
        "image/gif"
    } else if data.starts_with(&[0x52, 0x49, 0x46, 0x46]) && data.get(8..12) == Some(&[0x57, 0x45, 0x42, 0x50]) {
        "image/webp"
    } else if data.starts_with(&[0x42, 0x4D]) {
        "image/bmp"
    } else {
        // Most of the catalog is JPEG; assume it when nothing matches
        "image/jpeg"
    }
}
