//! Core building blocks of the previewer: the [`Blob`] byte container and the
//! disk-backed LRU cache that stores resized images.

pub mod cache;
pub mod types;

pub use cache::{CacheError, CacheKey, LruCache};
pub use types::Blob;
