use crate::origin::FetchError;
use thiserror::Error;

/// Failure of a resize request.
///
/// Messages are owned strings so one result can be handed to every request waiting on a shared
/// computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
	#[error("invalid dimensions {width}x{height}, width and height must be between 1 and {max_dimension}")]
	InvalidDimensions { width: i64, height: i64, max_dimension: u32 },

	#[error("origin server is unreachable: {0}")]
	OriginUnreachable(String),

	#[error("unable to download image: {0}")]
	Fetch(String),

	#[error("unable to resize image: {0}")]
	Resize(String),

	#[error("unable to read image from cache: {0}")]
	CacheRead(String),
}

impl ResolveError {
	/// Whether the request itself was malformed, as opposed to a failure further upstream.
	pub fn is_client_error(&self) -> bool {
		matches!(self, ResolveError::InvalidDimensions { .. })
	}
}

impl From<FetchError> for ResolveError {
	fn from(err: FetchError) -> Self {
		match err {
			FetchError::Unreachable(message) => ResolveError::OriginUnreachable(message),
			FetchError::Transfer(message) => ResolveError::Fetch(message),
		}
	}
}
