pub mod assets;
pub mod error;
pub mod services;

pub use error::ApiError;
