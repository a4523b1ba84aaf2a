//! Turns resize requests into resized images: cache lookup first, otherwise download, resize
//! and store.

mod error;
mod image_resizer;
mod in_flight;
mod resolve;

pub use error::ResolveError;
pub use image_resizer::ImageResizer;
pub use resolve::Resolver;
