use anyhow::{Context, Result, bail};
use image::{ColorType, DynamicImage, ImageEncoder, ImageFormat, codecs::png::PngEncoder, load_from_memory_with_format};
use previewer_core::Blob;

/// Encodes an 8-bit Grey, GreyA, RGB or RGBA image as PNG.
pub fn image2blob(image: &DynamicImage) -> Result<Blob> {
	if !matches!(
		image.color(),
		ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
	) {
		bail!("PNG encoding only supports 8-bit Grey, GreyA, RGB or RGBA images");
	}

	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new(&mut buffer)
		.write_image(image.as_bytes(), image.width(), image.height(), image.color().into())
		.with_context(|| format!("encoding {}x{} image as PNG", image.width(), image.height()))?;

	Ok(Blob::from(buffer))
}

pub fn blob2image(blob: &Blob) -> Result<DynamicImage> {
	load_from_memory_with_format(blob.as_slice(), ImageFormat::Png)
		.with_context(|| format!("decoding PNG image ({} bytes)", blob.len()))
}
