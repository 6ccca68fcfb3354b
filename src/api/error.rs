use std::io::Cursor;

use rocket::http::Status;
use serde_json::json;

use crate::images::LoadError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    NotInCollection(String),
    LoadFailed(LoadError),
}

impl From<LoadError> for ApiError {
    fn from(error: LoadError) -> Self {
        ApiError::LoadFailed(error)
    }
}

impl<'r> rocket::response::Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'static> {
        match self {
            ApiError::NotFound(message) => {
                let body = json!({
                    "error": "Not found",
                    "message": message
                })
                .to_string();

                rocket::Response::build()
                    .status(Status::NotFound)
                    .sized_body(None, Cursor::new(body))
                    .ok()
            }
            ApiError::NotInCollection(message) => {
                let body = json!({
                    "error": "URL not in collection",
                    "message": message
                })
                .to_string();

                rocket::Response::build()
                    .status(Status::Forbidden)
                    .sized_body(None, Cursor::new(body))
                    .ok()
            }
            ApiError::LoadFailed(error) => {
                let body = json!({
                    "error": "Image load failed",
                    "message": error.to_string()
                })
                .to_string();

                rocket::Response::build()
                    .status(Status::BadGateway)
                    .sized_body(None, Cursor::new(body))
                    .ok()
            }
        }
    }
}
