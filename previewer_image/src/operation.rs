use anyhow::{Context, Result, ensure};
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::{ColorType, DynamicImage};
use std::borrow::Cow;

/// Largest target accepted by [`resize_exact`], in pixels.
pub const MAX_PIXELS: u64 = 100_000_000;

/// Resamples `image` to exactly `width`×`height` pixels with a Lanczos3 filter.
///
/// The aspect ratio is not preserved. 8-bit Grey, GreyA, RGB and RGBA images keep their colour
/// type; everything else is converted to RGBA8 first. Targets above [`MAX_PIXELS`] are refused
/// before anything is allocated.
pub fn resize_exact(image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
	ensure!(width > 0 && height > 0, "cannot resize an image to {width}x{height}");
	ensure!(
		u64::from(width) * u64::from(height) <= MAX_PIXELS,
		"cannot resize an image to {width}x{height}, the limit is {MAX_PIXELS} pixels"
	);

	let source: Cow<DynamicImage> = match image.color() {
		ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => Cow::Borrowed(image),
		_ => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
	};

	let mut dst_image = DynamicImage::new(width, height, source.color());
	Resizer::new()
		.resize(
			&*source,
			&mut dst_image,
			&ResizeOptions::default().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
		)
		.with_context(|| {
			format!(
				"resizing {}x{} {:?} image to {width}x{height}",
				image.width(),
				image.height(),
				image.color()
			)
		})?;

	Ok(dst_image)
}
