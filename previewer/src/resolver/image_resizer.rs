use anyhow::Result;
use previewer_core::Blob;
use std::fmt::Debug;

/// CPU-bound conversion of an encoded source image into an encoded image of exactly
/// `width`×`height` pixels.
pub trait ImageResizer: Debug + Send + Sync {
	fn resize(&self, width: u32, height: u32, source: &Blob) -> Result<Blob>;
}

impl ImageResizer for previewer_image::Resizer {
	fn resize(&self, width: u32, height: u32, source: &Blob) -> Result<Blob> {
		previewer_image::Resizer::resize(self, width, height, source)
	}
}
