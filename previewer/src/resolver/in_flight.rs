use super::ResolveError;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use previewer_core::{Blob, CacheKey};
use std::{collections::HashMap, future::Future, sync::Arc};

type SharedResult = Shared<BoxFuture<'static, Result<Blob, ResolveError>>>;

/// Running computations, one per cache key.
///
/// The first request for a key starts the computation; later requests for the same key wait
/// for the same result. An entry is removed by its own computation once it has finished, so a
/// finished result is never handed out twice.
#[derive(Clone, Default)]
pub struct InFlight {
	running: Arc<Mutex<HashMap<CacheKey, SharedResult>>>,
}

impl InFlight {
	/// Joins the computation for `key`, starting `compute` if none is running.
	pub async fn join<F>(&self, key: &CacheKey, compute: F) -> Result<Blob, ResolveError>
	where
		F: FnOnce() -> BoxFuture<'static, Result<Blob, ResolveError>>,
	{
		let shared = {
			let mut running = self.running.lock();
			if let Some(shared) = running.get(key) {
				log::trace!("join running computation for {key}");
				shared.clone()
			} else {
				let shared = self.finishing(key.clone(), compute()).boxed().shared();
				running.insert(key.clone(), shared.clone());
				shared
			}
		};
		shared.await
	}

	fn finishing(
		&self,
		key: CacheKey,
		future: impl Future<Output = Result<Blob, ResolveError>> + Send + 'static,
	) -> impl Future<Output = Result<Blob, ResolveError>> + Send + 'static {
		let running = Arc::clone(&self.running);
		async move {
			let result = future.await;
			running.lock().remove(&key);
			result
		}
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.running.lock().len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	#[tokio::test]
	async fn concurrent_joins_share_one_computation() {
		let in_flight = InFlight::default();
		let key = CacheKey::new("b", "k", 1, 1);
		let started = Arc::new(AtomicUsize::new(0));

		let requests = (0..5).map(|_| {
			let started = Arc::clone(&started);
			in_flight.join(&key, move || {
				async move {
					started.fetch_add(1, Ordering::SeqCst);
					tokio::time::sleep(Duration::from_millis(50)).await;
					Ok(Blob::from("done"))
				}
				.boxed()
			})
		});
		let results = futures::future::join_all(requests).await;

		assert_eq!(started.load(Ordering::SeqCst), 1);
		assert!(results.iter().all(|r| r.as_ref() == Ok(&Blob::from("done"))));
		assert_eq!(in_flight.len(), 0);
	}

	#[tokio::test]
	async fn finished_computations_are_not_reused() {
		let in_flight = InFlight::default();
		let key = CacheKey::new("b", "k", 1, 1);

		let first = in_flight
			.join(&key, || async { Err(ResolveError::Fetch("first".into())) }.boxed())
			.await;
		let second = in_flight.join(&key, || async { Ok(Blob::from("second")) }.boxed()).await;

		assert_eq!(first, Err(ResolveError::Fetch("first".into())));
		assert_eq!(second, Ok(Blob::from("second")));
	}
}
