use super::{ImageResizer, ResolveError, in_flight::InFlight};
use crate::{
	config::{Config, DEFAULT_MAX_DIMENSION},
	origin::{self, Origin},
};
use anyhow::{Context, Result};
use futures::FutureExt;
use previewer_core::{Blob, CacheError, CacheKey, LruCache};
use std::{fmt::Debug, sync::Arc};
use tokio::task::spawn_blocking;

/// Answers resize requests from the cache, or by downloading, resizing and caching the image.
///
/// Concurrent misses for the same image are computed independently unless coalescing is
/// enabled with [`Resolver::with_coalescing`].
pub struct Resolver {
	pipeline: Arc<Pipeline>,
	in_flight: Option<InFlight>,
	max_dimension: u32,
}

#[derive(Debug)]
struct Pipeline {
	cache: Arc<LruCache>,
	origin: Arc<dyn Origin>,
	resizer: Arc<dyn ImageResizer>,
}

struct Request {
	cache_key: CacheKey,
	width: u32,
	height: u32,
	bucket: String,
	key: String,
}

impl Resolver {
	pub fn new(cache: Arc<LruCache>, origin: Arc<dyn Origin>, resizer: Arc<dyn ImageResizer>) -> Resolver {
		Resolver {
			pipeline: Arc::new(Pipeline { cache, origin, resizer }),
			in_flight: None,
			max_dimension: DEFAULT_MAX_DIMENSION,
		}
	}

	/// Rejects requests for a width or height above `max_dimension`.
	pub fn with_max_dimension(mut self, max_dimension: u32) -> Resolver {
		self.max_dimension = max_dimension;
		self
	}

	/// Shares one download and resize between concurrent misses for the same image.
	pub fn with_coalescing(mut self, enabled: bool) -> Resolver {
		self.in_flight = enabled.then(InFlight::default);
		self
	}

	/// Opens the cache and builds the origin described by `config`.
	pub fn from_config(config: &Config) -> Result<Resolver> {
		let cache_path = config.cache.path();
		let cache = LruCache::new(&cache_path, config.cache.capacity())
			.with_context(|| format!("opening image cache at {cache_path:?}"))?;
		let origin = origin::from_config(&config.origin).context("configuring origin")?;

		let resizer = previewer_image::Resizer::with_jpeg_quality(config.resize.jpeg_quality());

		Ok(Resolver::new(Arc::new(cache), origin, Arc::new(resizer))
			.with_coalescing(config.cache.coalesce_misses())
			.with_max_dimension(config.resize.max_dimension()))
	}

	pub fn cache(&self) -> &LruCache {
		&self.pipeline.cache
	}

	pub fn coalesces_misses(&self) -> bool {
		self.in_flight.is_some()
	}

	/// Returns the image `key` from `bucket`, resized to exactly `width`×`height` pixels.
	///
	/// Dimensions outside `1..=max_dimension` are rejected before any disk or network access. A
	/// failed attempt to store the result in the cache does not fail the request.
	pub async fn resolve(&self, width: i64, height: i64, bucket: &str, key: &str) -> Result<Blob, ResolveError> {
		let max_dimension = self.max_dimension;
		let valid = 1..=max_dimension;
		let (width_px, height_px) = match (u32::try_from(width), u32::try_from(height)) {
			(Ok(w), Ok(h)) if valid.contains(&w) && valid.contains(&h) => (w, h),
			_ => {
				return Err(ResolveError::InvalidDimensions {
					width,
					height,
					max_dimension,
				});
			}
		};

		let cache_key = CacheKey::new(bucket, key, width_px, height_px);
		if let Some(blob) = self.pipeline.lookup(&cache_key).await? {
			log::debug!("serve {bucket}/{key} at {width}x{height} from cache");
			return Ok(blob);
		}

		let request = Request {
			cache_key: cache_key.clone(),
			width: width_px,
			height: height_px,
			bucket: bucket.to_string(),
			key: key.to_string(),
		};
		let pipeline = Arc::clone(&self.pipeline);

		match &self.in_flight {
			None => pipeline.produce(request).await,
			Some(in_flight) => in_flight.join(&cache_key, move || pipeline.produce(request).boxed()).await,
		}
	}
}

impl Pipeline {
	async fn lookup(&self, cache_key: &CacheKey) -> Result<Option<Blob>, ResolveError> {
		let cache = Arc::clone(&self.cache);
		let cache_key = cache_key.clone();
		let result = spawn_blocking(move || cache.get(cache_key.as_str()))
			.await
			.map_err(|err| ResolveError::CacheRead(format!("cache lookup task failed: {err}")))?;

		match result {
			Ok(blob) => Ok(Some(blob)),
			Err(CacheError::NotFound) => Ok(None),
			Err(err) => {
				log::warn!("{err}");
				Err(ResolveError::CacheRead(err.to_string()))
			}
		}
	}

	async fn produce(self: Arc<Self>, request: Request) -> Result<Blob, ResolveError> {
		let Request {
			cache_key,
			width,
			height,
			bucket,
			key,
		} = request;

		let source = self.origin.fetch(&bucket, &key).await.map_err(|err| {
			log::warn!("fetching {bucket}/{key} failed: {err}");
			ResolveError::from(err)
		})?;

		let resizer = Arc::clone(&self.resizer);
		let resized = spawn_blocking(move || resizer.resize(width, height, &source))
			.await
			.map_err(|err| ResolveError::Resize(format!("resize task failed: {err}")))?
			.map_err(|err| {
				log::warn!("resizing {bucket}/{key} to {width}x{height} failed: {err:#}");
				ResolveError::Resize(format!("{err:#}"))
			})?;

		let cache = Arc::clone(&self.cache);
		let stored = resized.clone();
		if let Err(err) = spawn_blocking(move || cache.set(cache_key.as_str(), &stored)).await {
			log::error!("storing resized image failed: {err}");
		}

		log::debug!("resized {bucket}/{key} to {width}x{height}");
		Ok(resized)
	}
}

impl Debug for Resolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Resolver")
			.field("cache", &self.pipeline.cache)
			.field("origin", &self.pipeline.origin)
			.field("resizer", &self.pipeline.resizer)
			.field("coalesce_misses", &self.in_flight.is_some())
			.field("max_dimension", &self.max_dimension)
			.finish()
	}
}
