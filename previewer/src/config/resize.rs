use anyhow::{Result, bail};
use previewer_image::{DEFAULT_JPEG_QUALITY, MAX_PIXELS};
use serde::Deserialize;

pub const DEFAULT_MAX_DIMENSION: u32 = 10_000;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResizeConfig {
	/// Largest width or height a request may ask for. Larger requests are rejected with 400.
	pub max_dimension: Option<u32>,

	/// Quality of re-encoded JPEG images, 1 to 99.
	pub jpeg_quality: Option<u8>,
}

impl ResizeConfig {
	pub fn max_dimension(&self) -> u32 {
		self.max_dimension.unwrap_or(DEFAULT_MAX_DIMENSION)
	}

	pub fn jpeg_quality(&self) -> u8 {
		self.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY)
	}

	pub fn validate(&self) -> Result<()> {
		if let Some(max) = self.max_dimension {
			if max == 0 || u64::from(max) * u64::from(max) > MAX_PIXELS {
				bail!("resize.max_dimension must be between 1 and {DEFAULT_MAX_DIMENSION}, got {max}");
			}
		}
		if let Some(quality) = self.jpeg_quality {
			if !(1..=99).contains(&quality) {
				bail!("resize.jpeg_quality must be between 1 and 99, got {quality}");
			}
		}
		Ok(())
	}
}
