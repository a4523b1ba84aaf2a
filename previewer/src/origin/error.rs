use thiserror::Error;

/// Failure to download a source image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
	/// The origin could not be reached at all: name resolution or connection failed.
	#[error("origin is unreachable: {0}")]
	Unreachable(String),

	/// The origin was reached, but did not deliver the object.
	#[error("download failed: {0}")]
	Transfer(String),
}
