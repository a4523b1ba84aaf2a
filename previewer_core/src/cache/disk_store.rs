//! Flat-directory blob storage addressed by encoded names.
//!
//! Keys are turned into file names with a reversible encoding: ASCII alphanumerics and `.`, `_`,
//! `-`, `,` are kept, every other byte becomes `%` followed by two lowercase hex digits, and the
//! suffix `.bin` is appended. [`decode_name`] restores the key from a file name produced this way.

use super::CacheError;
use crate::Blob;
use std::{
	fs::{create_dir_all, read, read_dir, remove_file, rename, write},
	io,
	path::{Path, PathBuf},
};

const SUFFIX: &str = ".bin";

/// Appended to a name while its bytes are being written.
pub const PARTIAL_SUFFIX: &str = ".part";

#[derive(Debug)]
pub struct DiskStore {
	path: PathBuf,
}

impl DiskStore {
	/// Opens the store rooted at `path`, creating the directory if it does not exist.
	pub fn new(path: &Path) -> Result<Self, CacheError> {
		create_dir_all(path).map_err(|source| CacheError::CreateDir {
			path: path.to_path_buf(),
			source,
		})?;
		Ok(Self {
			path: path.to_path_buf(),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Writes `blob` to `{name}.part` and renames it over `name`.
	///
	/// On failure both files are removed, so a later read of `name` fails instead of returning
	/// truncated or outdated bytes.
	pub fn write(&self, name: &str, blob: &Blob) -> io::Result<()> {
		let target = self.path.join(name);
		let partial = self.path.join(format!("{name}{PARTIAL_SUFFIX}"));

		let result = write(&partial, blob.as_slice()).and_then(|()| rename(&partial, &target));
		if result.is_err() {
			let _ = remove_file(&partial);
			let _ = remove_file(&target);
		}
		result
	}

	pub fn read(&self, name: &str) -> io::Result<Blob> {
		Ok(Blob::from(read(self.path.join(name))?))
	}

	pub fn delete(&self, name: &str) -> io::Result<()> {
		remove_file(self.path.join(name))
	}

	/// Deletes a file and logs failures. A file that is already gone counts as deleted.
	pub(super) fn delete_logged(&self, name: &str) {
		match self.delete(name) {
			Ok(()) => {}
			Err(err) if err.kind() == io::ErrorKind::NotFound => {
				log::debug!("cache file '{name}' was already missing");
			}
			Err(source) => log::error!(
				"{}",
				CacheError::RemoveFailure {
					name: name.to_string(),
					source
				}
			),
		}
	}

	/// Lists the names of all files in the store directory that [`decode_name`] accepts.
	pub fn names(&self) -> io::Result<Vec<String>> {
		self.files(|name| decode_name(name).is_some())
	}

	/// Lists the names of all files in the store directory that `accept` returns `true` for.
	pub fn files(&self, accept: impl Fn(&str) -> bool) -> io::Result<Vec<String>> {
		let mut names = Vec::new();
		for entry in read_dir(&self.path)? {
			let entry = entry?;
			if !entry.file_type()?.is_file() {
				continue;
			}
			let file_name = entry.file_name();
			match file_name.to_str() {
				Some(name) if accept(name) => names.push(name.to_string()),
				_ => {}
			}
		}
		names.sort();
		Ok(names)
	}
}

/// Encodes `key` into a file name that is safe on common file systems.
pub fn encode_name(key: &str) -> String {
	let mut name = String::with_capacity(key.len() + SUFFIX.len());
	for byte in key.bytes() {
		if is_plain(byte) {
			name.push(byte as char);
		} else {
			name.push_str(&format!("%{byte:02x}"));
		}
	}
	name.push_str(SUFFIX);
	name
}

/// Restores the key from a name produced by [`encode_name`].
///
/// Returns `None` for every string `encode_name` can not have produced.
pub fn decode_name(name: &str) -> Option<String> {
	let encoded = name.strip_suffix(SUFFIX)?.as_bytes();
	let mut bytes = Vec::with_capacity(encoded.len());
	let mut i = 0;
	while i < encoded.len() {
		match encoded[i] {
			b'%' => {
				let hex = encoded.get(i + 1..i + 3)?;
				if !hex.iter().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(c)) {
					return None;
				}
				let byte = u8::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?;
				if is_plain(byte) {
					return None;
				}
				bytes.push(byte);
				i += 3;
			}
			byte if is_plain(byte) => {
				bytes.push(byte);
				i += 1;
			}
			_ => return None,
		}
	}
	String::from_utf8(bytes).ok()
}

fn is_plain(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-' | b',')
}
