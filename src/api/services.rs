use rocket::get;
use rocket::serde::json::Json;

use crate::api::ApiError;
use crate::catalog;
use crate::models::{Language, Service};
use crate::share::{self, ShareLinks};

#[get("/?<lang>")]
pub fn get_services(lang: Option<&str>) -> Json<Vec<Service>> {
    let lang = Language::from_code(lang.unwrap_or_default());
    Json(
        catalog::service_ids()
            .filter_map(|id| catalog::localized(id, lang))
            .collect(),
    )
}

#[get("/<id>?<lang>")]
pub fn get_service(id: &str, lang: Option<&str>) -> Result<Json<Service>, ApiError> {
    let lang = Language::from_code(lang.unwrap_or_default());
    catalog::localized(id, lang)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Service '{}' not found", id)))
}

// The shared text names the service in the caller's language
#[get("/<id>/share?<lang>")]
pub fn get_share_links(id: &str, lang: Option<&str>) -> Result<Json<ShareLinks>, ApiError> {
    let lang = Language::from_code(lang.unwrap_or_default());
    let service = catalog::localized(id, lang)
        .ok_or_else(|| ApiError::NotFound(format!("Service '{}' not found", id)))?;
    Ok(Json(share::share_links(Some(&service.title))))
}
