pub mod assets;
pub mod image;

pub use assets::{AssetCache, CacheEntry, FetchOptions, ResolvedAssets};
pub use image::ImageCache;
