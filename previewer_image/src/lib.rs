//! Decoding, resampling and re-encoding of preview images.
//!
//! Only PNG and JPEG sources are supported. The output keeps the format of the source.

pub mod format;
mod operation;
mod resizer;

#[cfg(test)]
mod test_images;

pub use format::{ImageFormat, mime_type};
pub use operation::{MAX_PIXELS, resize_exact};
pub use resizer::{DEFAULT_JPEG_QUALITY, Resizer};
