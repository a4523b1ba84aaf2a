//! Doubles for the origin and the resizer, and a tiny local origin web server.

use crate::origin::{FetchError, Origin};
use anyhow::{Result, bail};
use async_trait::async_trait;
use axum::{
	Router,
	body::Body,
	http::{Uri, header},
	response::Response,
};
use previewer_core::Blob;
use std::{
	collections::HashMap,
	net::SocketAddr,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
use tokio::net::TcpListener;

/// Origin answering every fetch with the bytes `"{bucket}/{key}"`, or with a fixed failure.
#[derive(Debug, Default)]
pub struct MockOrigin {
	fetches: AtomicUsize,
	delay: Option<Duration>,
	failure: Option<FetchError>,
}

impl MockOrigin {
	pub fn failing(failure: FetchError) -> MockOrigin {
		MockOrigin {
			failure: Some(failure),
			..Default::default()
		}
	}

	pub fn with_delay(mut self, delay: Duration) -> MockOrigin {
		self.delay = Some(delay);
		self
	}

	pub fn fetches(&self) -> usize {
		self.fetches.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl Origin for MockOrigin {
	async fn fetch(&self, bucket: &str, key: &str) -> Result<Blob, FetchError> {
		self.fetches.fetch_add(1, Ordering::SeqCst);
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		match &self.failure {
			Some(failure) => Err(failure.clone()),
			None => Ok(Blob::from(format!("{bucket}/{key}"))),
		}
	}
}

/// Resizer producing `"{width}x{height}:{source}"` instead of an image.
#[derive(Debug, Default)]
pub struct MockResizer {
	calls: AtomicUsize,
	fail: bool,
}

impl MockResizer {
	pub fn failing() -> MockResizer {
		MockResizer {
			fail: true,
			..Default::default()
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl crate::resolver::ImageResizer for MockResizer {
	fn resize(&self, width: u32, height: u32, source: &Blob) -> Result<Blob> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if self.fail {
			bail!("cannot decode source image");
		}
		Ok(Blob::from(format!(
			"{width}x{height}:{}",
			String::from_utf8_lossy(source.as_slice())
		)))
	}
}

pub struct OriginServer {
	addr: SocketAddr,
	hits: Arc<AtomicUsize>,
}

impl OriginServer {
	/// `ip:port`, usable as the bucket of an `HttpOrigin`.
	pub fn host(&self) -> String {
		self.addr.to_string()
	}

	pub fn hits(&self) -> usize {
		self.hits.load(Ordering::SeqCst)
	}
}

/// Serves `files` (path to content) on a random local port; everything else is 404.
///
/// Found files carry `ETag` and `Last-Modified`, so the server also answers S3 `GetObject`
/// requests for `/{bucket}/{key}`.
pub async fn spawn_origin(files: Vec<(&str, Vec<u8>)>) -> OriginServer {
	let files: Arc<HashMap<String, Vec<u8>>> =
		Arc::new(files.into_iter().map(|(path, data)| (path.to_string(), data)).collect());
	let hits = Arc::new(AtomicUsize::new(0));

	let router = Router::new().fallback({
		let hits = Arc::clone(&hits);
		move |uri: Uri| {
			let files = Arc::clone(&files);
			let hits = Arc::clone(&hits);
			async move {
				hits.fetch_add(1, Ordering::SeqCst);
				match files.get(uri.path()) {
					Some(data) => Response::builder()
						.header(header::ETAG, "\"1\"")
						.header(header::LAST_MODIFIED, "Thu, 01 Jan 2026 00:00:00 GMT")
						.body(Body::from(data.clone()))
						.unwrap(),
					None => Response::builder().status(404).body(Body::from("Not Found")).unwrap(),
				}
			}
		}
	});

	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, router.into_make_service()).await.unwrap();
	});

	OriginServer { addr, hits }
}
