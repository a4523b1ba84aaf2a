//! Configuration of the previewer service.
//!
//! - [`Config`]: top-level YAML loader
//! - [`ServerConfig`]: listening address
//! - [`CacheConfig`]: size, location and miss coalescing of the image cache
//! - [`OriginConfig`]: where source images are downloaded from
//! - [`ResizeConfig`]: size limit and output quality
//!
//! Every field is optional. Defaults are applied where the values are consumed, so command line
//! arguments can override file settings field by field.

mod cache;
mod main;
mod origin;
mod resize;
mod server;

pub use cache::CacheConfig;
pub use main::Config;
pub use origin::{OriginConfig, OriginKind};
pub use resize::{DEFAULT_MAX_DIMENSION, ResizeConfig};
pub use server::ServerConfig;
