use super::{FetchError, Origin, build_client, download};
use anyhow::Result;
use async_trait::async_trait;
use previewer_core::Blob;
use reqwest::Client;
use std::time::Duration;

/// Downloads `http://{bucket}/{key}`.
#[derive(Debug)]
pub struct HttpOrigin {
	client: Client,
}

impl HttpOrigin {
	pub fn new(timeout: Duration) -> Result<HttpOrigin> {
		Ok(HttpOrigin {
			client: build_client(timeout)?,
		})
	}

	pub fn url(bucket: &str, key: &str) -> String {
		format!("http://{bucket}/{}", key.trim_start_matches('/'))
	}
}

#[async_trait]
impl Origin for HttpOrigin {
	async fn fetch(&self, bucket: &str, key: &str) -> Result<Blob, FetchError> {
		download(&self.client, &Self::url(bucket, key)).await
	}
}
