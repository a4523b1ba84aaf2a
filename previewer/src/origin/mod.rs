//! Clients that download source images.
//!
//! Two origins exist: [`HttpOrigin`] treats the bucket as a web server's host name,
//! [`ObjectStoreOrigin`] reads objects from an S3 compatible store, signed when credentials are
//! configured. Both classify failures into [`FetchError::Unreachable`] and
//! [`FetchError::Transfer`].

mod error;
mod http;
mod s3;
mod traits;

pub use error::FetchError;
pub use http::HttpOrigin;
pub use s3::ObjectStoreOrigin;
pub use traits::Origin;

use crate::config::{OriginConfig, OriginKind};
use anyhow::{Context, Result};
use previewer_core::Blob;
use reqwest::Client;
use std::{sync::Arc, time::Duration};

/// Builds the origin described by `config`.
pub fn from_config(config: &OriginConfig) -> Result<Arc<dyn Origin>> {
	config.validate()?;
	let timeout = config.timeout();
	Ok(match config.kind() {
		OriginKind::Http => Arc::new(HttpOrigin::new(timeout)?),
		OriginKind::ObjectStore => Arc::new(ObjectStoreOrigin::from_config(config)?),
	})
}

fn build_client(timeout: Duration) -> Result<Client> {
	Client::builder()
		.timeout(timeout)
		.tcp_keepalive(Duration::from_secs(600))
		.use_rustls_tls()
		.build()
		.context("building HTTP client")
}

/// Downloads `url` completely.
async fn download(client: &Client, url: &str) -> Result<Blob, FetchError> {
	log::debug!("download {url}");

	let response = client.get(url).send().await.map_err(|err| {
		if err.is_connect() {
			FetchError::Unreachable(format!("{url}: {err}"))
		} else {
			FetchError::Transfer(format!("{url}: {err}"))
		}
	})?;

	let status = response.status();
	if !status.is_success() {
		return Err(FetchError::Transfer(format!("{url}: server responded with {status}")));
	}

	let bytes = response
		.bytes()
		.await
		.map_err(|err| FetchError::Transfer(format!("{url}: reading body failed: {err}")))?;

	log::trace!("downloaded {} bytes from {url}", bytes.len());
	Ok(Blob::from(bytes.to_vec()))
}
