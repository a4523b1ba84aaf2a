//! Disk-backed LRU caching of resized images.

mod cache_key;
mod disk_store;
mod error;
mod lru_cache;
mod recency_list;

pub use cache_key::{CACHE_KEY_LENGTH, CacheKey, is_cache_key};
pub use disk_store::{DiskStore, PARTIAL_SUFFIX, decode_name, encode_name};
pub use error::CacheError;
pub use lru_cache::LruCache;
pub use recency_list::{Handle, Iter, RecencyList};
