//! A capacity-bounded, disk-backed LRU cache.
//!
//! The in-memory index maps keys to positions in a [`RecencyList`]; values live as files in a
//! [`DiskStore`]. Every operation runs under one exclusive lock, including its disk I/O, so the
//! index, the list and the directory always change together. Unrelated keys therefore wait for
//! each other's disk access.
//!
//! Persistence is best-effort: failed writes and deletes are logged and never returned. A key
//! whose write failed stays indexed, and a later [`LruCache::get`] reports it as
//! [`CacheError::ReadFailure`].
//!
//! ```rust
//! use previewer_core::{Blob, LruCache};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let cache = LruCache::new(dir.path(), 2).unwrap();
//! cache.set("a", &Blob::from("A"));
//! cache.set("b", &Blob::from("B"));
//! cache.set("c", &Blob::from("C"));
//!
//! assert!(cache.get("a").unwrap_err().is_not_found());
//! assert_eq!(cache.get("b").unwrap(), Blob::from("B"));
//! ```

use super::{
	CacheError, DiskStore,
	cache_key::is_cache_key,
	disk_store::{PARTIAL_SUFFIX, decode_name, encode_name},
	recency_list::{Handle, RecencyList},
};
use crate::Blob;
use parking_lot::Mutex;
use std::{
	collections::HashMap,
	fmt::Debug,
	path::{Path, PathBuf},
};

struct Entry {
	key: String,
	name: String,
}

struct Inner {
	index: HashMap<String, Handle>,
	recency: RecencyList<Entry>,
	store: DiskStore,
}

pub struct LruCache {
	capacity: usize,
	path: PathBuf,
	inner: Mutex<Inner>,
}

impl LruCache {
	/// Creates a cache holding at most `capacity` entries in the directory `path`.
	///
	/// The directory is created if needed. Files a previous instance stored under a
	/// [`CacheKey`](super::CacheKey) are unreachable from the new, empty index and get deleted,
	/// together with unfinished writes. Every other file is left alone.
	pub fn new(path: &Path, capacity: usize) -> Result<Self, CacheError> {
		if capacity == 0 {
			return Err(CacheError::InvalidCapacity);
		}

		let store = DiskStore::new(path)?;
		remove_leftovers(&store);

		log::debug!("open cache at {path:?} with capacity {capacity}");

		Ok(Self {
			capacity,
			path: path.to_path_buf(),
			inner: Mutex::new(Inner {
				index: HashMap::with_capacity(capacity),
				recency: RecencyList::with_capacity(capacity),
				store,
			}),
		})
	}

	/// Returns the stored bytes for `key` and marks the key as most recently used.
	///
	/// An absent key yields [`CacheError::NotFound`] without touching the disk. A failed read
	/// yields [`CacheError::ReadFailure`]; the entry stays in the cache.
	pub fn get(&self, key: &str) -> Result<Blob, CacheError> {
		let mut guard = self.inner.lock();
		let inner = &mut *guard;

		let Some(&handle) = inner.index.get(key) else {
			log::trace!("cache miss for '{key}'");
			return Err(CacheError::NotFound);
		};
		inner.recency.move_to_front(handle);

		let entry = inner.recency.get(handle).ok_or(CacheError::NotFound)?;
		log::trace!("cache hit for '{key}'");
		inner.store.read(&entry.name).map_err(|source| CacheError::ReadFailure {
			name: entry.name.clone(),
			source,
		})
	}

	/// Stores `blob` under `key` and marks the key as most recently used.
	///
	/// A new key may push the least recently used entry out of the cache. Setting an existing
	/// key overwrites its stored bytes. Disk failures are logged, never returned.
	pub fn set(&self, key: &str, blob: &Blob) {
		let mut guard = self.inner.lock();
		let inner = &mut *guard;

		let name = match inner.index.get(key) {
			Some(&handle) => {
				inner.recency.move_to_front(handle);
				match inner.recency.get(handle) {
					Some(entry) => entry.name.clone(),
					None => encode_name(key),
				}
			}
			None => {
				let name = encode_name(key);
				let handle = inner.recency.push_front(Entry {
					key: key.to_string(),
					name: name.clone(),
				});
				inner.index.insert(key.to_string(), handle);
				if inner.recency.len() > self.capacity {
					inner.evict_back();
				}
				name
			}
		};

		if let Err(source) = inner.store.write(&name, blob) {
			log::error!("{}", CacheError::WriteFailure { name, source });
		}
	}

	/// Removes every entry and deletes its file.
	pub fn clear(&self) {
		let mut guard = self.inner.lock();
		let inner = &mut *guard;

		for entry in &inner.recency {
			inner.store.delete_logged(&entry.name);
		}
		let count = inner.index.len();
		inner.index.clear();
		inner.recency.clear();

		log::info!("cleared {count} entries from cache at {:?}", self.path);
	}

	pub fn len(&self) -> usize {
		self.inner.lock().index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Checks for `key` without changing its recency.
	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.lock().index.contains_key(key)
	}

	/// Returns all keys, from most to least recently used.
	pub fn keys_by_recency(&self) -> Vec<String> {
		self.inner.lock().recency.iter().map(|entry| entry.key.clone()).collect()
	}

	/// Verifies that index and recency list describe the same set of entries and that the list is
	/// free of broken links and cycles.
	pub fn is_consistent(&self) -> bool {
		let inner = self.inner.lock();
		inner.recency.is_consistent()
			&& inner.recency.len() == inner.index.len()
			&& inner.recency.len() <= self.capacity
			&& inner
				.index
				.iter()
				.all(|(key, handle)| inner.recency.get(*handle).is_some_and(|entry| &entry.key == key))
	}
}

impl Inner {
	fn evict_back(&mut self) {
		let Some(handle) = self.recency.back() else {
			return;
		};
		let Some(entry) = self.recency.remove(handle) else {
			return;
		};
		self.index.remove(&entry.key);
		log::debug!("evict '{}' from cache", entry.key);
		self.store.delete_logged(&entry.name);
	}
}

fn remove_leftovers(store: &DiskStore) {
	let names = match store.files(is_leftover) {
		Ok(names) => names,
		Err(err) => {
			log::warn!("unable to list cache directory {:?}: {err}", store.path());
			return;
		}
	};
	if names.is_empty() {
		return;
	}
	for name in &names {
		store.delete_logged(name);
	}
	log::info!("removed {} leftover files from cache directory {:?}", names.len(), store.path());
}

fn is_leftover(name: &str) -> bool {
	let name = name.strip_suffix(PARTIAL_SUFFIX).unwrap_or(name);
	decode_name(name).is_some_and(|key| is_cache_key(&key))
}

impl Debug for LruCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LruCache")
			.field("path", &self.path)
			.field("capacity", &self.capacity)
			.field("length", &self.len())
			.finish()
	}
}
