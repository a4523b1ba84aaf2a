use super::{FetchError, Origin};
use crate::config::OriginConfig;
use anyhow::{Result, bail};
use async_trait::async_trait;
use object_store::{ClientOptions, ObjectStore, RetryConfig, aws::AmazonS3Builder, path::Path};
use parking_lot::Mutex;
use previewer_core::Blob;
use std::{collections::HashMap, error::Error, fmt::Debug, io, sync::Arc, time::Duration};

/// Reads objects from an S3 compatible store with `GetObject`.
///
/// Requests are signed when credentials are configured and sent unsigned otherwise. Buckets are
/// addressed path-style below the endpoint. One client per bucket is created on first use and
/// kept for the lifetime of the origin.
pub struct ObjectStoreOrigin {
	endpoint: Option<String>,
	region: String,
	credentials: Option<(String, String)>,
	timeout: Duration,
	stores: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl ObjectStoreOrigin {
	pub fn new(endpoint: Option<&str>, region: &str, timeout: Duration) -> Result<ObjectStoreOrigin> {
		if let Some(endpoint) = endpoint {
			if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
				bail!("unsupported object store endpoint '{endpoint}', expected 'http://' or 'https://'");
			}
		}
		Ok(ObjectStoreOrigin {
			endpoint: endpoint.map(|e| e.trim_end_matches('/').to_string()),
			region: region.to_string(),
			credentials: None,
			timeout,
			stores: Mutex::new(HashMap::new()),
		})
	}

	pub fn from_config(config: &OriginConfig) -> Result<ObjectStoreOrigin> {
		let origin = ObjectStoreOrigin::new(config.endpoint.as_deref(), config.region(), config.timeout())?;
		Ok(match config.credentials() {
			Some((id, secret)) => origin.with_credentials(id, secret),
			None => origin,
		})
	}

	pub fn with_credentials(mut self, access_key_id: &str, secret_access_key: &str) -> ObjectStoreOrigin {
		self.credentials = Some((access_key_id.to_string(), secret_access_key.to_string()));
		self
	}

	fn store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>, FetchError> {
		let mut stores = self.stores.lock();
		if let Some(store) = stores.get(bucket) {
			return Ok(Arc::clone(store));
		}

		let mut retry = RetryConfig::default();
		retry.max_retries = 0;

		let mut builder = AmazonS3Builder::new()
			.with_region(&self.region)
			.with_bucket_name(bucket)
			.with_retry(retry)
			.with_client_options(ClientOptions::new().with_timeout(self.timeout))
			.with_allow_http(true);
		if let Some(endpoint) = &self.endpoint {
			builder = builder.with_endpoint(endpoint);
		}
		builder = match &self.credentials {
			Some((id, secret)) => builder.with_access_key_id(id).with_secret_access_key(secret),
			None => builder.with_skip_signature(true),
		};

		let store: Arc<dyn ObjectStore> = Arc::new(
			builder
				.build()
				.map_err(|err| FetchError::Transfer(format!("configuring bucket '{bucket}': {err}")))?,
		);
		log::debug!("created object store client for bucket '{bucket}'");
		stores.insert(bucket.to_string(), Arc::clone(&store));
		Ok(store)
	}
}

#[async_trait]
impl Origin for ObjectStoreOrigin {
	async fn fetch(&self, bucket: &str, key: &str) -> Result<Blob, FetchError> {
		let store = self.store(bucket)?;
		let path = Path::from(key);
		log::debug!("get object {bucket}/{path}");

		let bytes = match store.get(&path).await {
			Ok(result) => result.bytes().await,
			Err(err) => Err(err),
		}
		.map_err(|err| classify(bucket, err))?;

		log::trace!("downloaded {} bytes from {bucket}/{path}", bytes.len());
		Ok(Blob::from(bytes.to_vec()))
	}
}

fn classify(bucket: &str, err: object_store::Error) -> FetchError {
	match err {
		object_store::Error::NotFound { path, .. } => FetchError::Transfer(format!("{bucket}/{path}: object not found")),
		err if is_connect_error(&err) => FetchError::Unreachable(format!("{bucket}: {err}")),
		err => FetchError::Transfer(format!("{bucket}: {err}")),
	}
}

/// Searches the source chain of `err` for a failed connection attempt.
fn is_connect_error(err: &(dyn Error + 'static)) -> bool {
	let mut current = Some(err);
	while let Some(err) = current {
		if let Some(err) = err.downcast_ref::<reqwest::Error>() {
			if err.is_connect() {
				return true;
			}
		}
		if let Some(err) = err.downcast_ref::<io::Error>() {
			if matches!(
				err.kind(),
				io::ErrorKind::ConnectionRefused | io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable
			) {
				return true;
			}
		}
		current = err.source();
	}
	false
}

impl Debug for ObjectStoreOrigin {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ObjectStoreOrigin")
			.field("endpoint", &self.endpoint)
			.field("region", &self.region)
			.field("signed", &self.credentials.is_some())
			.field("timeout", &self.timeout)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{config::OriginKind, test_utils::spawn_origin};

	fn local_origin(host: &str) -> ObjectStoreOrigin {
		ObjectStoreOrigin::new(Some(&format!("http://{host}/")), "eu-central-1", Duration::from_secs(5)).unwrap()
	}

	#[test]
	fn rejects_endpoints_without_scheme() {
		assert!(ObjectStoreOrigin::new(Some("s3.example.org"), "us-east-1", Duration::from_secs(1)).is_err());
		assert!(ObjectStoreOrigin::new(None, "us-east-1", Duration::from_secs(1)).is_ok());
	}

	#[test]
	fn from_config_reads_credentials() {
		let config = OriginConfig {
			kind: Some(OriginKind::ObjectStore),
			endpoint: Some("http://127.0.0.1:9000".to_string()),
			access_key_id: Some("AKIA".to_string()),
			secret_access_key: Some("secret".to_string()),
			..Default::default()
		};
		let origin = ObjectStoreOrigin::from_config(&config).unwrap();
		assert_eq!(origin.endpoint.as_deref(), Some("http://127.0.0.1:9000"));
		assert_eq!(origin.region, "us-east-1");
		assert_eq!(origin.credentials, Some(("AKIA".to_string(), "secret".to_string())));

		let debug = format!("{origin:?}");
		assert!(!debug.contains("secret"), "{debug}");
	}

	#[tokio::test]
	async fn fetches_unsigned() {
		let server = spawn_origin(vec![("/photos/2024/cat.jpg", b"meow".to_vec())]).await;
		let origin = local_origin(&server.host());

		assert_eq!(origin.fetch("photos", "2024/cat.jpg").await.unwrap(), Blob::from("meow"));
		assert_eq!(server.hits(), 1);
	}

	#[tokio::test]
	async fn fetches_signed() {
		let server = spawn_origin(vec![("/photos/cat.jpg", b"meow".to_vec())]).await;
		let origin = local_origin(&server.host()).with_credentials("AKIAEXAMPLE", "example-secret");

		assert_eq!(origin.fetch("photos", "cat.jpg").await.unwrap(), Blob::from("meow"));
	}

	#[tokio::test]
	async fn missing_object_is_a_transfer_error() {
		let server = spawn_origin(vec![("/photos/cat.jpg", b"meow".to_vec())]).await;
		let origin = local_origin(&server.host());

		let err = origin.fetch("videos", "cat.jpg").await.unwrap_err();
		assert!(matches!(err, FetchError::Transfer(_)), "{err}");
	}

	#[tokio::test]
	async fn closed_port_fails() {
		let origin = local_origin("127.0.0.1:1");
		assert!(origin.fetch("photos", "cat.jpg").await.is_err());
	}

	#[tokio::test]
	async fn clients_are_reused_per_bucket() {
		let server = spawn_origin(vec![]).await;
		let origin = local_origin(&server.host());

		let _ = origin.fetch("a", "1").await;
		let _ = origin.fetch("a", "2").await;
		let _ = origin.fetch("b", "1").await;
		assert_eq!(origin.stores.lock().len(), 2);
	}

	#[test]
	fn refused_connections_are_recognised() {
		let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
		assert!(is_connect_error(&refused));

		let other = io::Error::other("disk full");
		assert!(!is_connect_error(&other));
	}
}
