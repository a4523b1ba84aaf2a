use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

fn ramp(value: u32, size: u32) -> u8 {
	(value * 255 / size) as u8
}

pub fn grey(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageLuma8(ImageBuffer::from_fn(width, height, |x, _| Luma([ramp(x, width)])))
}

pub fn greya(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageLumaA8(ImageBuffer::from_fn(width, height, |x, y| {
		LumaA([ramp(x, width), ramp(y, height)])
	}))
}

pub fn rgb(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
		Rgb([ramp(x, width), ramp(y, height), 128])
	}))
}

pub fn rgba(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, |x, y| {
		Rgba([ramp(x, width), ramp(y, height), 128, 255 - ramp(x, width)])
	}))
}
