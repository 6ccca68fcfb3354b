pub mod catalog;

pub use catalog::{AssetUrlsResponse, Contact, FaqItem, Language, Service, Website};
