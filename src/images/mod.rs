pub mod fetch;
pub mod retry;

pub use fetch::{ImageFetcher, LoadError};
pub use retry::{LoadState, LoadSupervisor, RetryPolicy};
