//! Deterministic cache keys for resize requests.
//!
//! A key is the lowercase hex SHA-256 digest of the ordered tuple `(bucket, object key, width,
//! height)`. String fields are length-prefixed before hashing, so `("ab", "c")` and `("a", "bc")`
//! never share a preimage.

use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Length of every key in characters.
pub const CACHE_KEY_LENGTH: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
	pub fn new(bucket: &str, key: &str, width: u32, height: u32) -> Self {
		let mut hasher = Sha256::new();
		for field in [bucket, key] {
			hasher.update((field.len() as u64).to_le_bytes());
			hasher.update(field.as_bytes());
		}
		hasher.update(width.to_le_bytes());
		hasher.update(height.to_le_bytes());
		CacheKey(hex::encode(hasher.finalize()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Checks whether `text` has the shape of a [`CacheKey`]: exactly [`CACHE_KEY_LENGTH`] lowercase
/// hex digits.
pub fn is_cache_key(text: &str) -> bool {
	text.len() == CACHE_KEY_LENGTH && text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl Display for CacheKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for CacheKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn identical_inputs_yield_identical_keys() {
		let a = CacheKey::new("photos", "cat.jpg", 300, 200);
		let b = CacheKey::new("photos", "cat.jpg", 300, 200);
		assert_eq!(a, b);
		assert_eq!(a.as_str().len(), CACHE_KEY_LENGTH);
		assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
	}

	#[rstest]
	#[case::bucket("pictures", "cat.jpg", 300, 200)]
	#[case::key("photos", "dog.jpg", 300, 200)]
	#[case::width("photos", "cat.jpg", 301, 200)]
	#[case::height("photos", "cat.jpg", 300, 201)]
	#[case::swapped_size("photos", "cat.jpg", 200, 300)]
	#[case::shifted_boundary("photoscat", ".jpg", 300, 200)]
	fn any_differing_field_changes_the_key(
		#[case] bucket: &str,
		#[case] key: &str,
		#[case] width: u32,
		#[case] height: u32,
	) {
		let reference = CacheKey::new("photos", "cat.jpg", 300, 200);
		assert_ne!(CacheKey::new(bucket, key, width, height), reference);
	}

	#[test]
	fn field_boundaries_are_unambiguous() {
		assert_ne!(CacheKey::new("ab", "c", 1, 1), CacheKey::new("a", "bc", 1, 1));
		assert_ne!(CacheKey::new("", "abc", 1, 1), CacheKey::new("abc", "", 1, 1));
	}

	#[rstest]
	#[case::too_short("abc".to_string(), false)]
	#[case::uppercase("A".repeat(CACHE_KEY_LENGTH), false)]
	#[case::not_hex("g".repeat(CACHE_KEY_LENGTH), false)]
	#[case::digits("0".repeat(CACHE_KEY_LENGTH), true)]
	fn recognises_key_shape(#[case] text: String, #[case] expected: bool) {
		assert_eq!(is_cache_key(&text), expected);
	}

	#[test]
	fn generated_keys_have_key_shape() {
		assert!(is_cache_key(CacheKey::new("photos", "cat.jpg", 300, 200).as_str()));
	}

	#[test]
	fn known_digest_is_stable() {
		// pins the hashing layout, a change here orphans every cached file
		let key = CacheKey::new("", "", 0, 0);
		let mut hasher = Sha256::new();
		hasher.update([0u8; 24]);
		assert_eq!(key.as_str(), hex::encode(hasher.finalize()));
	}
}
