//! Format detection and the PNG and JPEG codecs.
//!
//! Formats are detected by magic bytes, never by file name or content type headers.

pub mod jpeg;
pub mod png;

use anyhow::{Result, anyhow};
use image::DynamicImage;
use previewer_core::Blob;
use std::fmt::Display;

/// Content type used for blobs that are neither PNG nor JPEG.
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
	Png,
	Jpeg,
}

impl ImageFormat {
	/// Detects the format of `blob` from its leading bytes.
	pub fn detect(blob: &Blob) -> Result<ImageFormat> {
		match image::guess_format(blob.as_slice()) {
			Ok(image::ImageFormat::Png) => Ok(ImageFormat::Png),
			Ok(image::ImageFormat::Jpeg) => Ok(ImageFormat::Jpeg),
			Ok(other) => Err(anyhow!("unsupported image format: {other:?}")),
			Err(_) => Err(anyhow!("unsupported image format: {}", blob.as_hex_prefix(8))),
		}
	}

	pub fn mime_type(&self) -> &'static str {
		match self {
			ImageFormat::Png => "image/png",
			ImageFormat::Jpeg => "image/jpeg",
		}
	}

	pub fn decode(&self, blob: &Blob) -> Result<DynamicImage> {
		match self {
			ImageFormat::Png => png::blob2image(blob),
			ImageFormat::Jpeg => jpeg::blob2image(blob),
		}
	}

	/// Encodes `image` in this format. `jpeg_quality` is ignored for PNG.
	pub fn encode(&self, image: &DynamicImage, jpeg_quality: u8) -> Result<Blob> {
		match self {
			ImageFormat::Png => png::image2blob(image),
			ImageFormat::Jpeg => jpeg::image2blob(image, jpeg_quality),
		}
	}
}

impl Display for ImageFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			ImageFormat::Png => "PNG",
			ImageFormat::Jpeg => "JPEG",
		})
	}
}

/// Returns the content type of `blob`, falling back to `application/octet-stream`.
pub fn mime_type(blob: &Blob) -> &'static str {
	ImageFormat::detect(blob).map_or(MIME_OCTET_STREAM, |format| format.mime_type())
}
