//! This module provides the [`Blob`] struct, an owned chunk of bytes as it travels between the
//! origin, the resizer, the cache and the HTTP response.
//!
//! # Examples
//!
//! ```rust
//! use previewer_core::Blob;
//!
//! let blob = Blob::from("image bytes");
//! assert_eq!(blob.len(), 11);
//! assert_eq!(blob.as_slice(), b"image bytes");
//! assert_eq!(blob.into_vec(), b"image bytes".to_vec());
//! ```

use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns a reference to the underlying byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	/// Consumes this [`Blob`] and returns the underlying `Vec<u8>`.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the number of bytes.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if the blob holds no bytes.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns a hexadecimal string representation of the first `max` bytes, separated by spaces.
	///
	/// ```rust
	/// use previewer_core::Blob;
	///
	/// let blob = Blob::from(&[0x89, 0x50, 0x4e, 0x47]);
	/// assert_eq!(blob.as_hex_prefix(2), "89 50");
	/// ```
	#[must_use]
	pub fn as_hex_prefix(&self, max: usize) -> String {
		self
			.0
			.iter()
			.take(max)
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

impl AsRef<[u8]> for Blob {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({}): {}", self.0.len(), self.as_hex_prefix(16))?;
		if self.0.len() > 16 {
			write!(f, " ...")?;
		}
		Ok(())
	}
}
