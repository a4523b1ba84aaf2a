use super::FetchError;
use async_trait::async_trait;
use previewer_core::Blob;
use std::fmt::Debug;

/// Source of original images, addressed by bucket and object key.
#[async_trait]
pub trait Origin: Debug + Send + Sync {
	async fn fetch(&self, bucket: &str, key: &str) -> Result<Blob, FetchError>;
}
