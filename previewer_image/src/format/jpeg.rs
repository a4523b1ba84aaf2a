//! JPEG encoding and decoding.
//!
//! JPEG has no transparency. Images with an alpha channel lose it on encoding; every other
//! colour type is converted to 8-bit RGB first.

use anyhow::{Context, Result, bail};
use image::{ColorType, DynamicImage, ImageEncoder, ImageFormat, codecs::jpeg::JpegEncoder, load_from_memory_with_format};
use previewer_core::Blob;
use std::borrow::Cow;

/// Encodes `image` as JPEG with `quality` in `1..100`.
pub fn image2blob(image: &DynamicImage, quality: u8) -> Result<Blob> {
	if quality == 0 || quality >= 100 {
		bail!("JPEG quality must be between 1 and 99, got {quality}");
	}

	let image: Cow<DynamicImage> = match image.color() {
		ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(image),
		ColorType::La8 => Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8())),
		_ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
	};

	let mut buffer: Vec<u8> = Vec::new();
	JpegEncoder::new_with_quality(&mut buffer, quality)
		.write_image(image.as_bytes(), image.width(), image.height(), image.color().into())
		.with_context(|| format!("encoding {}x{} image as JPEG (q={quality})", image.width(), image.height()))?;

	Ok(Blob::from(buffer))
}

pub fn blob2image(blob: &Blob) -> Result<DynamicImage> {
	load_from_memory_with_format(blob.as_slice(), ImageFormat::Jpeg)
		.with_context(|| format!("decoding JPEG image ({} bytes)", blob.len()))
}
