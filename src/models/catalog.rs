use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
}

impl Language {
    // Anything unrecognized falls back to English
    pub fn from_code(code: &str) -> Self {
        match code {
            "hi" => Language::Hi,
            "mr" => Language::Mr,
            _ => Language::En,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub subtitle: String,
    pub tile_image: Option<String>,
    pub what_we_do: Vec<String>,
    pub faq: Vec<FaqItem>,
    pub service_area: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub websites: Vec<Website>,
    pub contact: Contact,
}

// Response wrapper carrying cache provenance alongside the payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUrlsResponse {
    pub data: Vec<String>,
    pub from_cache: bool,
    pub cache_age: Option<u64>,
}
