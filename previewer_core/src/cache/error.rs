use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors of the disk-backed LRU cache.
///
/// Only [`CacheError::NotFound`] and [`CacheError::ReadFailure`] are ever returned from
/// [`LruCache::get`](super::LruCache::get). Write and remove failures happen on the best-effort
/// persistence path of `set`, eviction and `clear`; they are logged, never returned.
#[derive(Error, Debug)]
pub enum CacheError {
	#[error("cache item does not exist")]
	NotFound,

	#[error("unable to read file '{name}' from cache: {source}")]
	ReadFailure { name: String, source: io::Error },

	#[error("unable to write file '{name}' to cache: {source}")]
	WriteFailure { name: String, source: io::Error },

	#[error("unable to remove file '{name}' from cache: {source}")]
	RemoveFailure { name: String, source: io::Error },

	#[error("cache capacity must be a positive number of entries")]
	InvalidCapacity,

	#[error("unable to create cache directory {path:?}: {source}")]
	CreateDir { path: PathBuf, source: io::Error },
}

impl CacheError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, CacheError::NotFound)
	}
}
