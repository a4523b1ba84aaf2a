//! HTTP server.
//!
//! - `handlers` turn requests into responses.
//! - `routes` composes the handlers into an Axum `Router`.
//! - `image_server` owns the lifecycle: binding, serving and graceful shutdown.

mod handlers;
mod image_server;
mod routes;

pub use image_server::ImageServer;
pub use routes::build_router;
