//! Router composition.

use super::handlers::{serve_not_found, serve_resize};
use crate::Resolver;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Builds the router:
/// - `GET /resize/{width}/{height}/{bucket}/{*key}` and its alias `GET /fill/...`
/// - `GET /status`, answering `ready!`
/// - 404 for everything else
pub fn build_router(resolver: Arc<Resolver>) -> Router {
	Router::new()
		.route("/status", get(|| async { "ready!" }))
		.route("/resize/{width}/{height}/{bucket}/{*key}", get(serve_resize))
		.route("/fill/{width}/{height}/{bucket}/{*key}", get(serve_resize))
		.fallback(serve_not_found)
		.with_state(resolver)
}
