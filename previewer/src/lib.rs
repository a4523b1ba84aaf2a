//! On-demand image resizing proxy.
//!
//! A request names a source image by bucket and key plus a target size. The [`Resolver`]
//! answers it from a disk-backed LRU cache or downloads the image from an [`origin`], resizes
//! it and caches the result. The [`server`] exposes this over HTTP.

pub mod config;
pub mod origin;
pub mod resolver;
pub mod server;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use resolver::{ResolveError, Resolver};
pub use server::ImageServer;
