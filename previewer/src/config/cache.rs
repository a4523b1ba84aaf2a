use anyhow::{Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
	/// Maximum number of resized images kept on disk.
	pub capacity: Option<usize>,

	/// Directory holding the cached images. Relative paths are resolved against the directory
	/// of the configuration file.
	pub path: Option<PathBuf>,

	/// Share one download and resize between concurrent requests for the same image.
	pub coalesce_misses: Option<bool>,
}

impl CacheConfig {
	pub fn override_optional_capacity(&mut self, capacity: &Option<usize>) {
		if capacity.is_some() {
			self.capacity = *capacity;
		}
	}

	pub fn override_optional_path(&mut self, path: &Option<PathBuf>) {
		if path.is_some() {
			self.path = path.clone();
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity.unwrap_or(DEFAULT_CAPACITY)
	}

	/// Defaults to `previewer` in the system's temporary directory.
	pub fn path(&self) -> PathBuf {
		self.path.clone().unwrap_or_else(|| std::env::temp_dir().join("previewer"))
	}

	pub fn coalesce_misses(&self) -> bool {
		self.coalesce_misses.unwrap_or(false)
	}

	pub fn validate(&self) -> Result<()> {
		if self.capacity == Some(0) {
			bail!("cache.capacity must be greater than 0");
		}
		Ok(())
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		if let Some(path) = &self.path {
			if path.is_relative() {
				self.path = Some(base.join(path));
			}
		}
	}
}
