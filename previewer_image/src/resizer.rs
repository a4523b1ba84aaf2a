use crate::{ImageFormat, operation::resize_exact};
use anyhow::{Context, Result};
use previewer_core::Blob;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Turns an encoded PNG or JPEG image into a resized image of the same format.
#[derive(Clone, Copy, Debug)]
pub struct Resizer {
	jpeg_quality: u8,
}

impl Resizer {
	pub fn new() -> Self {
		Self {
			jpeg_quality: DEFAULT_JPEG_QUALITY,
		}
	}

	pub fn with_jpeg_quality(jpeg_quality: u8) -> Self {
		Self { jpeg_quality }
	}

	/// Decodes `source`, resamples it to `width`×`height` and encodes it in the source format.
	///
	/// Fails for content that is not PNG or JPEG, for undecodable data and for a zero target size.
	pub fn resize(&self, width: u32, height: u32, source: &Blob) -> Result<Blob> {
		let format = ImageFormat::detect(source)?;
		let image = format.decode(source)?;
		log::trace!(
			"resize {format} image from {}x{} to {width}x{height}",
			image.width(),
			image.height()
		);

		let resized = resize_exact(&image, width, height)?;
		format
			.encode(&resized, self.jpeg_quality)
			.with_context(|| format!("re-encoding resized image as {format}"))
	}
}

impl Default for Resizer {
	fn default() -> Self {
		Self::new()
	}
}
