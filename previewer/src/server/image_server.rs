//! Lifecycle of the HTTP server.
//!
//! Request handling and routing live in `handlers` and `routes`; this module binds the socket,
//! spawns `axum::serve` and shuts it down gracefully.

use super::routes::build_router;
use crate::{Config, Resolver};
use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

pub struct ImageServer {
	ip: String,
	port: u16,
	resolver: Arc<Resolver>,
	/// One-shot channel to signal graceful shutdown to the serving task.
	exit_signal: Option<oneshot::Sender<()>>,
	/// Awaited in `stop()` so shutdown has completed when it returns.
	join: Option<JoinHandle<()>>,
	local_addr: Option<SocketAddr>,
}

impl ImageServer {
	pub fn new(ip: &str, port: u16, resolver: Resolver) -> ImageServer {
		ImageServer {
			ip: ip.to_owned(),
			port,
			resolver: Arc::new(resolver),
			exit_signal: None,
			join: None,
			local_addr: None,
		}
	}

	/// Opens the cache and the origin described by `config`. Does not bind yet.
	pub fn from_config(config: &Config) -> Result<ImageServer> {
		let resolver = Resolver::from_config(config)?;
		Ok(ImageServer::new(config.server.ip(), config.server.port(), resolver))
	}

	pub fn resolver(&self) -> &Resolver {
		&self.resolver
	}

	/// Address the server is listening on, once started. Useful with port 0.
	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.local_addr
	}

	/// Starts listening and serving requests.
	///
	/// If already running, the previous instance is stopped first.
	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() || self.join.is_some() {
			self.stop().await;
		}

		log::info!("starting server");

		let router = build_router(Arc::clone(&self.resolver));

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding server to {addr}"))?;
		let local_addr = listener.local_addr()?;
		log::info!("server listening on {local_addr}");

		let (tx, rx) = oneshot::channel::<()>();
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server task exited with error: {err}");
			}
		});

		self.exit_signal = Some(tx);
		self.join = Some(handle);
		self.local_addr = Some(local_addr);

		Ok(())
	}

	/// Triggers graceful shutdown and waits up to ten seconds for the serving task to finish.
	///
	/// Does nothing if the server is not running.
	pub async fn stop(&mut self) {
		if self.exit_signal.is_none() && self.join.is_none() {
			return;
		}

		log::info!("stopping server");

		if let Some(tx) = self.exit_signal.take() {
			let _ = tx.send(());
		}

		if let Some(handle) = self.join.take() {
			match tokio::time::timeout(Duration::from_secs(10), handle).await {
				Ok(Ok(())) => {}
				Ok(Err(join_err)) => log::warn!("server task join error: {join_err}"),
				Err(_) => log::warn!("server task did not shut down within timeout"),
			}
		}
		self.local_addr = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{MockOrigin, MockResizer};
	use previewer_core::LruCache;
	use tempfile::TempDir;

	const IP: &str = "127.0.0.1";

	fn new_server() -> (TempDir, ImageServer) {
		let dir = tempfile::tempdir().unwrap();
		let cache = Arc::new(LruCache::new(dir.path(), 8).unwrap());
		let resolver = Resolver::new(cache, Arc::new(MockOrigin::default()), Arc::new(MockResizer::default()));
		(dir, ImageServer::new(IP, 0, resolver))
	}

	async fn get(server: &ImageServer, path: &str) -> (u16, String) {
		let addr = server.local_addr().expect("server should be running");
		let response = reqwest::get(format!("http://{addr}{path}"))
			.await
			.expect("should have made a get request");
		let status = response.status().as_u16();
		(status, response.text().await.expect("should have returned text"))
	}

	#[tokio::test]
	async fn server() -> Result<()> {
		let (_dir, mut server) = new_server();
		server.start().await?;

		assert_eq!(get(&server, "/status").await, (200, "ready!".to_string()));
		assert_eq!(
			get(&server, "/resize/300/200/bucket/image.jpg").await,
			(200, "300x200:bucket/image.jpg".to_string())
		);
		assert_eq!(get(&server, "/nothing").await, (404, "Not Found".to_string()));
		assert_eq!(server.resolver().cache().len(), 1);

		server.stop().await;
		assert!(server.local_addr().is_none());
		Ok(())
	}

	#[tokio::test]
	async fn restart_and_repeated_stop() -> Result<()> {
		let (_dir, mut server) = new_server();
		assert!(server.exit_signal.is_none());

		server.start().await?;
		server.start().await?;
		assert_eq!(get(&server, "/status").await.0, 200);

		server.stop().await;
		server.stop().await;
		assert!(server.join.is_none());
		Ok(())
	}

	#[tokio::test]
	async fn bind_failure_is_reported() {
		let occupied = std::net::TcpListener::bind((IP, 0)).unwrap();
		let port = occupied.local_addr().unwrap().port();

		let (_dir, mut server) = new_server();
		server.port = port;
		let err = server.start().await.unwrap_err();
		assert_eq!(err.to_string(), format!("binding server to {IP}:{port}"));
	}

	#[test]
	fn from_config_applies_defaults() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let mut config = Config::default();
		config.cache.path = Some(dir.path().to_path_buf());

		let server = ImageServer::from_config(&config)?;
		assert_eq!(server.ip, "0.0.0.0");
		assert_eq!(server.port, 8080);
		assert_eq!(server.resolver().cache().capacity(), 1000);
		Ok(())
	}
}
